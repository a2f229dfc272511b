//! Partition routing — resolves an entity (plus optional partition
//! metadata) to the physical table that stores it.
//!
//! Routing is pure: the same `(entity, metadata)` under the same
//! namespace always resolves to the same name, regardless of call site
//! or time.

use std::sync::Arc;

use shardline_core::{
    EntityType, IndicationType, NamespaceStore, PartitionDimension, StrategyType,
};
use tracing::debug;

use crate::error::RouteError;

/// Optional partition metadata attached to a routed operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub indication: Option<IndicationType>,
    pub strategy: Option<StrategyType>,
}

impl RouteMeta {
    /// No partition metadata: route to the entity's default table.
    pub const NONE: RouteMeta = RouteMeta {
        indication: None,
        strategy: None,
    };

    pub fn indication(indication: IndicationType) -> Self {
        Self {
            indication: Some(indication),
            ..Self::NONE
        }
    }

    pub fn strategy(strategy: StrategyType) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::NONE
        }
    }

    /// Parse string-typed metadata from an outer boundary. Fails loudly
    /// on any out-of-enum value instead of silently defaulting.
    pub fn parse(indication: Option<&str>, strategy: Option<&str>) -> Result<Self, RouteError> {
        Ok(Self {
            indication: indication.map(str::parse).transpose()?,
            strategy: strategy.map(str::parse).transpose()?,
        })
    }
}

/// Resolves logical entities to physical table names under one namespace.
#[derive(Clone)]
pub struct PartitionRouter {
    namespace: Arc<NamespaceStore>,
}

impl PartitionRouter {
    pub fn new(namespace: Arc<NamespaceStore>) -> Self {
        Self { namespace }
    }

    /// The namespace this router derives names from.
    pub fn namespace(&self) -> &NamespaceStore {
        &self.namespace
    }

    /// Resolve the physical table for an entity.
    ///
    /// Partition metadata is honored only for the entity it partitions:
    /// an indication on `PseudoPosition`, a strategy on `RealPosition`.
    /// Everything else resolves to the entity's single default table.
    pub fn table_for(&self, entity: EntityType, meta: &RouteMeta) -> String {
        let table = match (entity, meta.indication, meta.strategy) {
            (EntityType::PseudoPosition, Some(indication), _) => format!(
                "{}_{}_{}",
                self.namespace.prefix(),
                indication.as_str(),
                entity.base_table()
            ),
            (EntityType::RealPosition, _, Some(strategy)) => format!(
                "{}_{}_{}",
                self.namespace.prefix(),
                strategy.as_str(),
                entity.base_table()
            ),
            _ => self.namespace.table_name(entity.base_table()),
        };
        debug!(entity = entity.as_str(), %table, "routed entity");
        table
    }

    /// All physical tables for a partition dimension, in declared enum
    /// order. Federation branch order depends on this being stable.
    pub fn dimension_tables(&self, dimension: PartitionDimension) -> Vec<String> {
        let prefix = self.namespace.prefix();
        let base = dimension.entity().base_table();
        dimension
            .values()
            .iter()
            .map(|value| format!("{prefix}_{value}_{base}"))
            .collect()
    }

    /// All physical tables for an entity's dimension, or
    /// [`RouteError::UnsupportedFederation`] if it has none.
    pub fn entity_tables(&self, entity: EntityType) -> Result<Vec<String>, RouteError> {
        let dimension = entity
            .dimension()
            .ok_or(RouteError::UnsupportedFederation(entity))?;
        Ok(self.dimension_tables(dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardline_core::UnknownPartitionValue;

    // The TempDir guard keeps the persisted file alive for the test.
    fn router_for(project: &str) -> (tempfile::TempDir, PartitionRouter) {
        let dir = tempfile::tempdir().unwrap();
        let store = NamespaceStore::open_with_fallback(
            &[dir.path().join("namespace.json")],
            project,
        )
        .unwrap();
        let router = PartitionRouter::new(Arc::new(store));
        (dir, router)
    }

    #[test]
    fn partitioned_names() {
        let (_dir, router) = router_for("CTS v3.1");
        assert_eq!(
            router.table_for(
                EntityType::PseudoPosition,
                &RouteMeta::indication(IndicationType::Direction)
            ),
            "cts_v3_1_direction_pseudo_positions"
        );

        let (_dir, router) = router_for("acme");
        assert_eq!(
            router.table_for(
                EntityType::RealPosition,
                &RouteMeta::strategy(StrategyType::Step)
            ),
            "acme_step_real_positions"
        );
    }

    #[test]
    fn metadata_for_the_wrong_entity_is_ignored() {
        let (_dir, router) = router_for("acme");
        // A strategy on PseudoPosition does not partition it.
        assert_eq!(
            router.table_for(
                EntityType::PseudoPosition,
                &RouteMeta::strategy(StrategyType::Simple)
            ),
            "acme_pseudo_positions"
        );
        assert_eq!(
            router.table_for(
                EntityType::Connection,
                &RouteMeta::indication(IndicationType::Active)
            ),
            "acme_exchange_connections"
        );
    }

    #[test]
    fn default_routing_is_total() {
        let (_dir, router) = router_for("acme");
        for entity in EntityType::ALL {
            let table = router.table_for(entity, &RouteMeta::NONE);
            assert!(table.starts_with("acme_"), "{table}");
        }
        assert_eq!(
            router.table_for(EntityType::Connection, &RouteMeta::NONE),
            "acme_exchange_connections"
        );
        assert_eq!(
            router.table_for(EntityType::Setting, &RouteMeta::NONE),
            "acme_settings"
        );
    }

    #[test]
    fn routing_is_pure() {
        let (_dir, router) = router_for("acme");
        let meta = RouteMeta::indication(IndicationType::Move);
        let first = router.table_for(EntityType::PseudoPosition, &meta);
        for _ in 0..10 {
            assert_eq!(router.table_for(EntityType::PseudoPosition, &meta), first);
        }
    }

    #[test]
    fn dimension_tables_follow_declared_order() {
        let (_dir, router) = router_for("CTS v3.1");
        assert_eq!(
            router.dimension_tables(PartitionDimension::Indication),
            vec![
                "cts_v3_1_active_pseudo_positions",
                "cts_v3_1_direction_pseudo_positions",
                "cts_v3_1_move_pseudo_positions",
            ]
        );
        assert_eq!(
            router.dimension_tables(PartitionDimension::Strategy),
            vec![
                "cts_v3_1_simple_real_positions",
                "cts_v3_1_advanced_real_positions",
                "cts_v3_1_step_real_positions",
            ]
        );
        // Stable across calls.
        assert_eq!(
            router.dimension_tables(PartitionDimension::Indication),
            router.dimension_tables(PartitionDimension::Indication)
        );
    }

    #[test]
    fn entity_tables_requires_a_dimension() {
        let (_dir, router) = router_for("acme");
        assert_eq!(router.entity_tables(EntityType::PseudoPosition).unwrap().len(), 3);
        assert_eq!(
            router.entity_tables(EntityType::Connection).unwrap_err(),
            RouteError::UnsupportedFederation(EntityType::Connection)
        );
    }

    #[test]
    fn parse_rejects_out_of_enum_values() {
        let meta = RouteMeta::parse(Some("direction"), None).unwrap();
        assert_eq!(meta.indication, Some(IndicationType::Direction));

        let err = RouteMeta::parse(Some("sideways"), None).unwrap_err();
        assert!(matches!(
            err,
            RouteError::UnknownPartitionValue(UnknownPartitionValue { .. })
        ));

        assert!(RouteMeta::parse(None, Some("bold")).is_err());
        assert_eq!(RouteMeta::parse(None, None).unwrap(), RouteMeta::NONE);
    }

    #[test]
    fn rename_moves_every_routed_name() {
        let (_dir, router) = router_for("My Cool Bot!!");
        assert_eq!(
            router.table_for(EntityType::Log, &RouteMeta::NONE),
            "my_cool_bot_logs"
        );

        router.namespace().rename("Bot #2").unwrap();
        assert_eq!(
            router.table_for(EntityType::Log, &RouteMeta::NONE),
            "bot_2_logs"
        );
        for table in router.dimension_tables(PartitionDimension::Strategy) {
            assert!(table.starts_with("bot_2_"), "{table}");
            assert!(!table.contains("my_cool_bot"), "{table}");
        }
    }
}
