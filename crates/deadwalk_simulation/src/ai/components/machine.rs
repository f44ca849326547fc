//! Generic AI state machine driver
//!
//! Владеет набором состояний (по одному объекту на тип), активным
//! состоянием и "записанным" типом текущего состояния.
//!
//! Состояния не хранят ссылку на агента: контекст агента передаётся в
//! каждый вызов (`M::Context<'_>`), поэтому нет циклов agent → state → agent.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Тип состояния AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum AiStateType {
    #[default]
    None,
    Idle,
    Alerted,
    Patrol,
    Attack,
    Feeding,
    Pursuit,
    Dead,
}

/// Тип события trigger-объёма (сенсор, arrival volume, melee zone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum TriggerEventKind {
    Enter,
    Stay,
    Exit,
}

/// Семейство машин: связывает контекст агента и тип контакта сенсора.
///
/// Контекст: GAT, т.к. содержит заимствования компонентов на время одного вызова.
pub trait MachineKind: 'static {
    type Context<'a>;
    type Contact;
}

/// Поведенческое состояние
///
/// Один объект состояния обслуживает одного агента: локальные таймеры
/// состояния живут прямо в объекте.
pub trait AiState<M: MachineKind>: Send + Sync {
    fn state_type(&self) -> AiStateType;

    fn on_enter(&mut self, _ctx: &mut M::Context<'_>) {}

    fn on_exit(&mut self, _ctx: &mut M::Context<'_>) {}

    /// Решение на тик: возвращает тип состояния на следующий тик
    fn on_update(&mut self, ctx: &mut M::Context<'_>) -> AiStateType;

    /// Root motion → locomotion
    fn on_animator_updated(&mut self, _ctx: &mut M::Context<'_>) {}

    /// IK look-at
    fn on_animator_ik_updated(&mut self, _ctx: &mut M::Context<'_>) {}

    fn on_trigger_event(&mut self, _ctx: &mut M::Context<'_>, _kind: TriggerEventKind, _contact: &M::Contact) {}

    fn on_destination_reached(&mut self, _ctx: &mut M::Context<'_>, _reached: bool) {}
}

/// Результат перехода за тик (для телеметрии/событий)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: AiStateType,
    /// Запрошенный тип (записывается в current_type даже при fallback)
    pub requested: AiStateType,
    /// Тип реально запущенного объекта состояния (None → машина inert)
    pub active: Option<AiStateType>,
}

impl Transition {
    pub fn is_fallback(&self) -> bool {
        self.active != Some(self.requested)
    }
}

/// State machine driver
pub struct StateMachine<M: MachineKind> {
    states: HashMap<AiStateType, Box<dyn AiState<M>>>,
    /// Ключ реально активного объекта состояния
    active: Option<AiStateType>,
    /// Записанный тип. Может расходиться с `active` после fallback
    /// (запрошенный незарегистрированный тип остаётся записанным).
    current_type: AiStateType,
    started: bool,
}

impl<M: MachineKind> StateMachine<M> {
    pub fn new(initial: AiStateType) -> Self {
        Self {
            states: HashMap::new(),
            active: None,
            current_type: initial,
            started: false,
        }
    }

    /// Регистрация состояния. Первая регистрация типа выигрывает,
    /// дубликаты игнорируются (возвращает false).
    pub fn register_state(&mut self, state: Box<dyn AiState<M>>) -> bool {
        let state_type = state.state_type();
        if self.states.contains_key(&state_type) {
            return false;
        }
        self.states.insert(state_type, state);
        true
    }

    pub fn is_registered(&self, state_type: AiStateType) -> bool {
        self.states.contains_key(&state_type)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Записанный тип текущего состояния
    pub fn current_type(&self) -> AiStateType {
        self.current_type
    }

    /// Тип реально работающего объекта состояния
    pub fn active_type(&self) -> Option<AiStateType> {
        self.active
    }

    /// Нет активного состояния → Tick no-op
    pub fn is_inert(&self) -> bool {
        self.active.is_none()
    }

    /// Старт: входим в начальное состояние, если оно зарегистрировано
    pub fn start(&mut self, ctx: &mut M::Context<'_>) {
        if self.started {
            return;
        }
        self.started = true;

        if let Some(state) = self.states.get_mut(&self.current_type) {
            state.on_enter(ctx);
            self.active = Some(self.current_type);
        } else {
            self.active = None;
            crate::logger::log_warning(&format!(
                "StateMachine: initial state {:?} is not registered → machine inert",
                self.current_type
            ));
        }
    }

    /// Один тик: OnUpdate активного состояния + переход при смене типа
    pub fn tick(&mut self, ctx: &mut M::Context<'_>) -> Option<Transition> {
        let active_key = self.active?;
        let state = self.states.get_mut(&active_key)?;

        let requested = state.on_update(ctx);
        if requested == self.current_type {
            return None;
        }

        let from = self.current_type;
        let target_key = if self.states.contains_key(&requested) {
            Some(requested)
        } else if self.states.contains_key(&AiStateType::Idle) {
            crate::logger::log_warning(&format!(
                "StateMachine: {:?} is not registered → fallback to Idle",
                requested
            ));
            Some(AiStateType::Idle)
        } else {
            crate::logger::log_error(&format!(
                "StateMachine: {:?} and Idle are not registered → machine inert",
                requested
            ));
            None
        };

        if let Some(current) = self.states.get_mut(&active_key) {
            current.on_exit(ctx);
        }

        self.active = None;
        if let Some(key) = target_key {
            if let Some(next) = self.states.get_mut(&key) {
                next.on_enter(ctx);
                self.active = Some(key);
            }
        }

        // Записываем ЗАПРОШЕННЫЙ тип безусловно (даже при fallback)
        self.current_type = requested;

        Some(Transition {
            from,
            requested,
            active: self.active,
        })
    }

    /// Принудительный вход в состояние в обход OnUpdate
    ///
    /// Используется по окончании реанимации (→ Alerted). Если тип не
    /// зарегистрирован: ничего не меняется, возвращает false.
    pub fn force_state(&mut self, state_type: AiStateType, ctx: &mut M::Context<'_>) -> bool {
        if !self.states.contains_key(&state_type) {
            return false;
        }

        if let Some(current) = self.active.and_then(|key| self.states.get_mut(&key)) {
            current.on_exit(ctx);
        }

        if let Some(next) = self.states.get_mut(&state_type) {
            next.on_enter(ctx);
        }
        self.active = Some(state_type);
        self.current_type = state_type;
        self.started = true;
        true
    }

    /// Выход из активного состояния без входа в новое (ragdoll takeover)
    pub fn suspend(&mut self, ctx: &mut M::Context<'_>) {
        if let Some(current) = self.active.and_then(|key| self.states.get_mut(&key)) {
            current.on_exit(ctx);
        }
        self.active = None;
        self.current_type = AiStateType::None;
    }

    pub fn animator_updated(&mut self, ctx: &mut M::Context<'_>) {
        if let Some(state) = self.active_state_mut() {
            state.on_animator_updated(ctx);
        }
    }

    pub fn animator_ik_updated(&mut self, ctx: &mut M::Context<'_>) {
        if let Some(state) = self.active_state_mut() {
            state.on_animator_ik_updated(ctx);
        }
    }

    pub fn trigger_event(&mut self, ctx: &mut M::Context<'_>, kind: TriggerEventKind, contact: &M::Contact) {
        if let Some(state) = self.active_state_mut() {
            state.on_trigger_event(ctx, kind, contact);
        }
    }

    pub fn destination_reached(&mut self, ctx: &mut M::Context<'_>, reached: bool) {
        if let Some(state) = self.active_state_mut() {
            state.on_destination_reached(ctx, reached);
        }
    }

    fn active_state_mut(&mut self) -> Option<&mut Box<dyn AiState<M>>> {
        let key = self.active?;
        self.states.get_mut(&key)
    }
}
