/// Sound engine: looped menu music via rodio.
///
/// Tracks are generated procedurally at start-up as mono f32 sample
/// buffers and looped through a single music `Sink`. Volume changes go
/// straight to that sink, so muting never stops or restarts the track.
///
/// Compile without the "sound" feature to disable audio entirely (the stub
/// SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::cell::RefCell;
    use std::f32::consts::PI;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::{debug, warn};

    const SAMPLE_RATE: u32 = 22050;

    struct Playing {
        track: String,
        sink: Sink,
    }

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        menu_theme: Vec<f32>,
        music: RefCell<Option<Playing>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output device, running silent: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                menu_theme: gen_menu_theme(),
                music: RefCell::new(None),
            })
        }

        /// Loop `track`. A track that is already looping keeps playing.
        pub fn play_looped(&self, track: &str) {
            let mut music = self.music.borrow_mut();
            if music.as_ref().map_or(false, |p| p.track == track) {
                return;
            }

            let samples = match track {
                "Main_Menu" => self.menu_theme.clone(),
                other => {
                    warn!(track = other, "unknown music track");
                    return;
                }
            };

            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    warn!("could not open music sink: {e}");
                    return;
                }
            };
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples).repeat_infinite());
            debug!(track, "music started");

            // Replacing the old entry drops its sink, which stops it.
            *music = Some(Playing { track: track.to_string(), sink });
        }

        pub fn set_music_volume(&self, level: f32) {
            if let Some(p) = self.music.borrow().as_ref() {
                p.sink.set_volume(level.clamp(0.0, 1.0));
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Track generators: mono samples at SAMPLE_RATE
    // ════════════════════════════════════════════════════════════

    /// Square-ish voice (fundamental + 3rd harmonic) with a short decay.
    fn voice(freq: f32, i: usize, n: usize) -> f32 {
        let t = i as f32 / SAMPLE_RATE as f32;
        let env = 1.0 - (i as f32 / n as f32).powf(0.7) * 0.8;
        let wave = (t * freq * 2.0 * PI).sin() * 0.7 + (t * freq * 3.0 * 2.0 * PI).sin() * 0.3;
        wave * env
    }

    /// Menu theme: I–vi–IV–V arpeggios over a root bass, 8 bars at 140 bpm.
    fn gen_menu_theme() -> Vec<f32> {
        // C, Am, F, G triads (one octave above middle C) and their roots.
        let chords: [([f32; 3], f32); 4] = [
            ([523.3, 659.3, 784.0], 130.8),
            ([440.0, 523.3, 659.3], 110.0),
            ([349.2, 440.0, 523.3], 87.3),
            ([392.0, 493.9, 587.3], 98.0),
        ];
        let eighth = (SAMPLE_RATE as f32 * 60.0 / 140.0 / 2.0) as usize;
        let pattern = [0usize, 1, 2, 1, 0, 1, 2, 1];

        let mut samples = Vec::with_capacity(eighth * 8 * 8);
        for bar in 0..8 {
            let (triad, root) = chords[bar % chords.len()];
            for &step in &pattern {
                let lead = triad[step];
                for i in 0..eighth {
                    // Bass phase runs across notes so it doesn't click.
                    let t = samples.len() as f32 / SAMPLE_RATE as f32;
                    let bass = (t * root * 2.0 * PI).sin() * 0.5;
                    samples.push((voice(lead, i, eighth) * 0.6 + bass * 0.4) * 0.3);
                }
            }
        }
        samples
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_looped(&self, _track: &str) {}
    pub fn set_music_volume(&self, _level: f32) {}
}
