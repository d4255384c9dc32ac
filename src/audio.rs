//! Hit feedback sound
//!
//! Plays the host's `<audio id="hit-sound">` clip when it has a source,
//! otherwise a short procedural thud through Web Audio. Failures are logged
//! and swallowed; the game never waits on audio.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, Document, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::platform::frame::Timeout;
use crate::settings::Settings;

/// A hit clip that is currently playing. Dropping it stops the clip and
/// clears the auto-stop timer.
pub struct HitSoundPlayback {
    element: HtmlAudioElement,
    _auto_stop: Option<Timeout>,
}

impl HitSoundPlayback {
    fn start(element: HtmlAudioElement, volume: f64, duration_ms: i32) -> Self {
        element.set_volume(volume);
        element.set_current_time(0.0);
        match element.play() {
            Ok(promise) => {
                // Autoplay policy rejections arrive asynchronously
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("Hit sound rejected: {:?}", e);
                    }
                });
            }
            Err(e) => log::warn!("Hit sound failed to start: {:?}", e),
        }

        let stopper = element.clone();
        let auto_stop = Timeout::start(duration_ms, move || {
            let _ = stopper.pause();
            stopper.set_current_time(0.0);
        });

        Self {
            element,
            _auto_stop: auto_stop,
        }
    }
}

impl Drop for HitSoundPlayback {
    fn drop(&mut self) {
        let _ = self.element.pause();
        self.element.set_current_time(0.0);
    }
}

/// Hit sound manager
pub struct HitSound {
    clip: Option<HtmlAudioElement>,
    ctx: Option<AudioContext>,
    settings: Settings,
    playback: Option<HitSoundPlayback>,
}

impl HitSound {
    /// Pick up `<audio id="hit-sound">` if the page provides one with a source
    pub fn new(document: &Document, settings: Settings) -> Self {
        let clip = document
            .get_element_by_id("hit-sound")
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
            .filter(|audio| !audio.src().is_empty());
        if clip.is_none() {
            log::info!("No hit sound clip, using procedural thud");
        }
        Self {
            clip,
            ctx: None,
            settings,
            playback: None,
        }
    }

    /// Play once, stopping any previous playback
    pub fn play(&mut self) {
        self.stop();
        let volume = self.settings.effective_volume();
        if volume <= 0.0 {
            return;
        }
        match self.clip.clone() {
            Some(clip) => {
                self.playback = Some(HitSoundPlayback::start(
                    clip,
                    volume,
                    self.settings.hit_duration_ms,
                ));
            }
            None => self.play_thud(volume as f32),
        }
    }

    pub fn stop(&mut self) {
        self.playback = None;
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::warn!("Failed to create AudioContext: {:?}", e);
                    return None;
                }
            }
        }
        self.ctx.as_ref()
    }

    /// Procedural fallback: a falling sine thump with a square crunch
    fn play_thud(&mut self, vol: f32) {
        let Some(ctx) = self.context() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let t = ctx.current_time();

        if let Some((osc, gain)) = create_osc(ctx, 180.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.8, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        if let Some((osc, gain)) = create_osc(ctx, 90.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }
}

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}
