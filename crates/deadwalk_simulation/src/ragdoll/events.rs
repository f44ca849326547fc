//! Ragdoll events

use bevy::prelude::*;

/// Отложенная реанимация созрела (пишет run_deferred_tasks)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReanimationDue {
    pub agent: Entity,
}

/// Смена режима управления костями (телеметрия)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneControlChanged {
    pub agent: Entity,
    pub from: super::BoneControlMode,
    pub to: super::BoneControlMode,
}
