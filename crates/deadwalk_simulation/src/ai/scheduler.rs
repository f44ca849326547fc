//! Deferred tasks: отложенные действия по симуляционным часам.
//!
//! Ключ задачи = (agent, purpose). Планирование по занятому ключу сначала
//! отменяет предыдущую задачу: двух одновременных отсчётов одной цели
//! у агента не бывает.

use bevy::prelude::*;

use super::services::SoundRequest;

/// Назначение отложенной задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPurpose {
    Reanimate,
    ScreamCooldown,
    DelayedSound(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskPayload {
    Reanimate,
    ScreamCooldownEnd,
    Sound(SoundRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeferredTask {
    pub agent: Entity,
    pub purpose: TaskPurpose,
    pub due: f32,
    pub payload: TaskPayload,
    sequence: u64,
}

/// Resource: очередь отложенных задач
#[derive(Resource, Debug, Default)]
pub struct DeferredTasks {
    tasks: Vec<DeferredTask>,
    next_sequence: u64,
    next_sound_id: u32,
}

impl DeferredTasks {
    /// Планирует задачу. Возвращает true, если отменила предыдущую с тем же ключом.
    pub fn schedule(&mut self, agent: Entity, purpose: TaskPurpose, due: f32, payload: TaskPayload) -> bool {
        let replaced = self.cancel(agent, purpose);

        self.tasks.push(DeferredTask {
            agent,
            purpose,
            due,
            payload,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;

        replaced
    }

    pub fn cancel(&mut self, agent: Entity, purpose: TaskPurpose) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| !(task.agent == agent && task.purpose == purpose));
        before != self.tasks.len()
    }

    /// Отмена всех задач агента (деспавн)
    pub fn cancel_agent(&mut self, agent: Entity) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.agent != agent);
        before - self.tasks.len()
    }

    pub fn is_pending(&self, agent: Entity, purpose: TaskPurpose) -> bool {
        self.count(agent, purpose) > 0
    }

    pub fn count(&self, agent: Entity, purpose: TaskPurpose) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.agent == agent && task.purpose == purpose)
            .count()
    }

    pub fn due_time(&self, agent: Entity, purpose: TaskPurpose) -> Option<f32> {
        self.tasks
            .iter()
            .find(|task| task.agent == agent && task.purpose == purpose)
            .map(|task| task.due)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Уникальный id для DelayedSound
    pub fn next_sound_id(&mut self) -> u32 {
        let id = self.next_sound_id;
        self.next_sound_id = self.next_sound_id.wrapping_add(1);
        id
    }

    /// Забирает созревшие задачи (`due <= now`) в порядке (due, планирование)
    pub fn take_due(&mut self, now: f32) -> Vec<DeferredTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self.tasks.drain(..).partition(|task| task.due <= now);
        self.tasks = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.sequence.cmp(&b.sequence)));
        due
    }
}
