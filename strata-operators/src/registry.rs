use std::fmt;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use strata_result::{Error, Result};
use strata_types::LogicalType;
use tracing::debug;

use crate::cast::{CastOperator, standard_casts};
use crate::operators::TypeOperators;
use crate::types::{
    BigIntOperators, BooleanOperators, DoubleOperators, UuidOperators, VarbinaryOperators,
    VarcharOperators, uuid::uuid_casts,
};

/// Operator sets by logical type and casts by `(source, target)` pair.
///
/// Lookups happen once when an operator is planned; the returned handle is
/// then used for every position without further dispatch on the type.
#[derive(Default)]
pub struct TypeOperatorRegistry {
    operators: FxHashMap<LogicalType, Arc<dyn TypeOperators>>,
    casts: FxHashMap<(LogicalType, LogicalType), CastOperator>,
}

impl TypeOperatorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every built-in operator set and cast.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        let sets: [Arc<dyn TypeOperators>; 6] = [
            Arc::new(BooleanOperators::new()),
            Arc::new(BigIntOperators::new()),
            Arc::new(DoubleOperators),
            Arc::new(UuidOperators),
            Arc::new(VarcharOperators::new()),
            Arc::new(VarbinaryOperators::new()),
        ];
        for ops in sets {
            registry.insert_operators(ops);
        }
        for cast in standard_casts().into_iter().chain(uuid_casts()) {
            registry.casts.insert((cast.source(), cast.target()), cast);
        }
        debug!(
            operators = registry.operators.len(),
            casts = registry.casts.len(),
            "built standard type operator registry"
        );
        registry
    }

    /// Shared process-wide [`standard`](Self::standard) registry.
    pub fn global() -> &'static TypeOperatorRegistry {
        static GLOBAL: OnceLock<TypeOperatorRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::standard)
    }

    fn insert_operators(&mut self, ops: Arc<dyn TypeOperators>) {
        self.operators.insert(ops.logical_type(), ops);
    }

    pub fn register_operators(&mut self, ops: Arc<dyn TypeOperators>) -> Result<()> {
        let logical_type = ops.logical_type();
        if self.operators.contains_key(&logical_type) {
            return Err(Error::InvalidArgumentError(format!(
                "operators for type {logical_type} are already registered"
            )));
        }
        debug!(%logical_type, "registering type operators");
        self.insert_operators(ops);
        Ok(())
    }

    pub fn register_cast(&mut self, cast: CastOperator) -> Result<()> {
        let key = (cast.source(), cast.target());
        if self.casts.contains_key(&key) {
            return Err(Error::InvalidArgumentError(format!(
                "cast from {} to {} is already registered",
                key.0, key.1
            )));
        }
        debug!(source = %key.0, target = %key.1, "registering cast");
        self.casts.insert(key, cast);
        Ok(())
    }

    pub fn operators(&self, logical_type: LogicalType) -> Result<Arc<dyn TypeOperators>> {
        self.operators
            .get(&logical_type)
            .cloned()
            .ok_or(Error::OperatorNotFound(logical_type.name()))
    }

    pub fn cast(&self, source: LogicalType, target: LogicalType) -> Result<CastOperator> {
        self.casts
            .get(&(source, target))
            .copied()
            .ok_or(Error::CastNotFound {
                from: source.name(),
                to: target.name(),
            })
    }

    /// Types with a registered operator set, in [`LogicalType`] order.
    pub fn registered_types(&self) -> Vec<LogicalType> {
        let mut types: Vec<_> = self.operators.keys().copied().collect();
        types.sort();
        types
    }
}

impl fmt::Debug for TypeOperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOperatorRegistry")
            .field("types", &self.registered_types())
            .field("casts", &self.casts.len())
            .finish()
    }
}
