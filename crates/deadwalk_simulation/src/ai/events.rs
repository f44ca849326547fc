//! AI Events: уведомления хоста → ядро и ядро → хост.
//!
//! Хост (физика/анимация) пишет SensorEvent, TargetTriggerEvent,
//! MeleeZoneEvent, AnimationNotify. Ядро пишет AiStateChanged и AgentEffect.

use bevy::prelude::*;

use super::components::{AiStateType, TriggerEventKind};
use super::services::AnimationSignal;
use crate::components::SensorContact;

/// Контакт в сенсоре агента (Enter/Stay/Exit)
#[derive(Event, Debug, Clone)]
pub struct SensorEvent {
    pub agent: Entity,
    pub kind: TriggerEventKind,
    pub contact: SensorContact,
}

/// Агент пересёк arrival volume своей цели
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetTriggerEvent {
    pub agent: Entity,
    pub kind: TriggerEventKind,
}

/// Melee zone коснулась коллайдера (резолвится в агента через registry)
#[derive(Event, Debug, Clone, Copy)]
pub struct MeleeZoneEvent {
    pub collider: Entity,
    pub kind: TriggerEventKind,
}

/// Уведомление от анимации агента
#[derive(Event, Debug, Clone, Copy)]
pub struct AnimationNotify {
    pub agent: Entity,
    pub signal: AnimationSignal,
}

/// Смена состояния AI (телеметрия)
///
/// `to`: запрошенный тип (записан в машину), `active`: тип реально
/// запущенного состояния. После fallback они расходятся.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AiStateChanged {
    pub agent: Entity,
    pub from: AiStateType,
    pub to: AiStateType,
    pub active: Option<AiStateType>,
}

/// Побочные эффекты состояний, которые исполняют системы
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Крик: audio-emitter stimulus радиуса `radius`
    Scream { position: Vec3, radius: f32 },
    /// Косметика: брызги крови (еда, попадания)
    BloodBurst { position: Vec3, amount: u32 },
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AgentEffect {
    pub agent: Entity,
    pub effect: EffectKind,
}
