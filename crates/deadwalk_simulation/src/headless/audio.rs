//! Headless audio: записывает one-shot'ы вместо воспроизведения.

use std::sync::{Arc, Mutex};

use crate::ai::services::{AudioPlayer, SoundHandle, SoundRequest};

/// Общий журнал звуков (клон журнала остаётся у теста/хоста)
pub type SoundLog = Arc<Mutex<Vec<SoundRequest>>>;

#[derive(Debug, Default)]
pub struct HeadlessAudio {
    log: SoundLog,
    next_handle: u64,
    stopped: Vec<SoundHandle>,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: SoundLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn log(&self) -> SoundLog {
        Arc::clone(&self.log)
    }

    pub fn stopped(&self) -> &[SoundHandle] {
        &self.stopped
    }
}

impl AudioPlayer for HeadlessAudio {
    fn play_one_shot(&mut self, request: SoundRequest) -> Option<SoundHandle> {
        crate::logger::log(&format!("🔊 [{}] {} at {:?}", request.group, request.clip, request.position));

        match self.log.lock() {
            Ok(mut log) => log.push(request),
            Err(_) => return None,
        }

        self.next_handle += 1;
        Some(SoundHandle(self.next_handle))
    }

    fn stop(&mut self, handle: SoundHandle) {
        self.stopped.push(handle);
    }
}
