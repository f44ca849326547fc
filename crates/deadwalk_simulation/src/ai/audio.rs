//! Audio collections: банки клипов с общими настройками воспроизведения.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::services::SoundRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioCollection {
    /// Track/group микшера
    pub group: String,
    pub volume: f32,
    pub spatial_blend: f32,
    pub priority: u8,
    /// Банки клипов (например: 0: крики, 1: рычание)
    pub banks: Vec<Vec<String>>,
}

impl Default for AudioCollection {
    fn default() -> Self {
        Self {
            group: "Zombies".to_string(),
            volume: 1.0,
            spatial_blend: 1.0,
            priority: 128,
            banks: Vec::new(),
        }
    }
}

impl AudioCollection {
    /// Случайный клип из банка
    pub fn clip(&self, bank: usize, rng: &mut impl Rng) -> Option<&str> {
        let clips = self.banks.get(bank)?;
        if clips.is_empty() {
            return None;
        }
        clips.get(rng.gen_range(0..clips.len())).map(String::as_str)
    }

    /// Готовый запрос на воспроизведение в позиции
    pub fn request(&self, bank: usize, position: Vec3, rng: &mut impl Rng) -> Option<SoundRequest> {
        let clip = self.clip(bank, rng)?.to_string();
        Some(SoundRequest {
            group: self.group.clone(),
            clip,
            position,
            volume: self.volume,
            spatial_blend: self.spatial_blend,
            priority: self.priority,
        })
    }
}

/// Component: звуки зомби
#[derive(Component, Debug, Clone, Default)]
pub struct ZombieSounds {
    pub scream: Option<AudioCollection>,
    /// Задержка крика относительно анимации
    pub scream_delay: f32,
}
