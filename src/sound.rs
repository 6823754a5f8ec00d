use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

use gtk4::prelude::*;
use gtk4::MediaFile;

/// Short sound effects played during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    Win,
    Loss,
}

impl Cue {
    const ALL: [Cue; 3] = [Cue::Click, Cue::Win, Cue::Loss];

    fn file_name(self) -> &'static str {
        match self {
            Cue::Click => "click.wav",
            Cue::Win => "win.wav",
            Cue::Loss => "loss.wav",
        }
    }
}

/// Fire-and-forget playback through GTK's media backend.
/// Cues whose file is missing are silently skipped.
pub struct SoundPlayer {
    streams: HashMap<Cue, MediaFile>,
    enabled: Cell<bool>,
}

impl SoundPlayer {
    /// Look for `sounds/<cue>.wav` below the resources directory.
    pub fn load<P: AsRef<Path>>(resources_dir: P, enabled: bool) -> Self {
        let dir = resources_dir.as_ref().join("sounds");
        let mut streams = HashMap::new();
        for cue in Cue::ALL {
            let path = dir.join(cue.file_name());
            if path.is_file() {
                streams.insert(cue, MediaFile::for_filename(&path));
            }
        }
        if streams.is_empty() {
            log::info!("no sound files in {}, sound disabled", dir.display());
        }
        Self {
            streams,
            enabled: Cell::new(enabled),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.streams.is_empty()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn play(&self, cue: Cue) {
        if !self.enabled.get() {
            return;
        }
        let Some(stream) = self.streams.get(&cue) else {
            return;
        };
        if let Some(err) = stream.error() {
            log::warn!("sound {:?} unavailable: {}", cue, err);
            return;
        }
        // Restart if the previous playback of this cue is still running.
        if stream.is_seekable() {
            stream.seek(0);
        }
        stream.play();
    }
}
