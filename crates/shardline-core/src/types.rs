//! Routing key types — entities and the dimensions that partition them.
//!
//! These enums are closed on purpose: an out-of-enum partition value is a
//! programmer error and is rejected at the string boundary
//! ([`IndicationType::from_str`] / [`StrategyType::from_str`]) instead of
//! silently falling back to a default table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A logical entity whose rows this layer routes to a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    PseudoPosition,
    RealPosition,
    Connection,
    MarketData,
    Setting,
    Log,
    Error,
    Config,
}

impl EntityType {
    /// Every entity type, in declaration order.
    pub const ALL: [EntityType; 8] = [
        EntityType::PseudoPosition,
        EntityType::RealPosition,
        EntityType::Connection,
        EntityType::MarketData,
        EntityType::Setting,
        EntityType::Log,
        EntityType::Error,
        EntityType::Config,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::PseudoPosition => "pseudo_position",
            EntityType::RealPosition => "real_position",
            EntityType::Connection => "connection",
            EntityType::MarketData => "market_data",
            EntityType::Setting => "setting",
            EntityType::Log => "log",
            EntityType::Error => "error",
            EntityType::Config => "config",
        }
    }

    /// Base (unpartitioned) table name for this entity. Total: every
    /// entity resolves to exactly one base table.
    pub fn base_table(self) -> &'static str {
        match self {
            EntityType::PseudoPosition => "pseudo_positions",
            EntityType::RealPosition => "real_positions",
            EntityType::Connection => "exchange_connections",
            EntityType::MarketData => "market_data",
            EntityType::Setting => "settings",
            EntityType::Log => "logs",
            EntityType::Error => "errors",
            EntityType::Config => "configs",
        }
    }

    /// The dimension this entity is partitioned by, if any. At most one
    /// dimension per entity; entities without one always resolve to a
    /// single physical table.
    pub fn dimension(self) -> Option<PartitionDimension> {
        match self {
            EntityType::PseudoPosition => Some(PartitionDimension::Indication),
            EntityType::RealPosition => Some(PartitionDimension::Strategy),
            _ => None,
        }
    }
}

/// A categorical axis along which one entity's storage is split across
/// multiple physical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionDimension {
    Indication,
    Strategy,
}

impl PartitionDimension {
    /// Partition values in declared order. Federation branch order
    /// depends on this being stable across calls.
    pub fn values(self) -> &'static [&'static str] {
        match self {
            PartitionDimension::Indication => &["active", "direction", "move"],
            PartitionDimension::Strategy => &["simple", "advanced", "step"],
        }
    }

    /// The entity this dimension partitions.
    pub fn entity(self) -> EntityType {
        match self {
            PartitionDimension::Indication => EntityType::PseudoPosition,
            PartitionDimension::Strategy => EntityType::RealPosition,
        }
    }
}

impl fmt::Display for PartitionDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionDimension::Indication => f.write_str("indication"),
            PartitionDimension::Strategy => f.write_str("strategy"),
        }
    }
}

/// An out-of-enum indication/strategy value reached the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {dimension} type: {value:?}")]
pub struct UnknownPartitionValue {
    pub dimension: PartitionDimension,
    pub value: String,
}

/// Indication type — partitions `PseudoPosition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicationType {
    Active,
    Direction,
    Move,
}

impl IndicationType {
    pub const ALL: [IndicationType; 3] = [
        IndicationType::Active,
        IndicationType::Direction,
        IndicationType::Move,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IndicationType::Active => "active",
            IndicationType::Direction => "direction",
            IndicationType::Move => "move",
        }
    }
}

impl FromStr for IndicationType {
    type Err = UnknownPartitionValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(IndicationType::Active),
            "direction" => Ok(IndicationType::Direction),
            "move" => Ok(IndicationType::Move),
            other => Err(UnknownPartitionValue {
                dimension: PartitionDimension::Indication,
                value: other.to_string(),
            }),
        }
    }
}

/// Strategy type — partitions `RealPosition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Simple,
    Advanced,
    Step,
}

impl StrategyType {
    pub const ALL: [StrategyType; 3] = [
        StrategyType::Simple,
        StrategyType::Advanced,
        StrategyType::Step,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyType::Simple => "simple",
            StrategyType::Advanced => "advanced",
            StrategyType::Step => "step",
        }
    }
}

impl FromStr for StrategyType {
    type Err = UnknownPartitionValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(StrategyType::Simple),
            "advanced" => Ok(StrategyType::Advanced),
            "step" => Ok(StrategyType::Step),
            other => Err(UnknownPartitionValue {
                dimension: PartitionDimension::Strategy,
                value: other.to_string(),
            }),
        }
    }
}
