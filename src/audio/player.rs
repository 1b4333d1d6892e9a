use super::backend::CuePlayer;
use super::request::{CueRequest, Tone};
use crate::error::AudioError;
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

pub const DEFAULT_RATE_WPM: u32 = 300;

const TONE_FADE_IN: Duration = Duration::from_millis(5);

pub fn default_speech_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak"
    }
}

/// A sine wave at the tone's pitch and volume, faded in briefly and faded
/// out to silence over its length.
pub fn tone_source(tone: &Tone) -> impl Source<Item = f32> + Send + 'static {
    let duration = Duration::from_secs_f32(tone.duration.max(0.0));
    let mut source = SineWave::new(tone.frequency)
        .amplify(tone.volume)
        .take_duration(duration);
    source.set_filter_fadeout();
    source.fade_in(TONE_FADE_IN)
}

/// The default output device and the sink tones are queued on.
struct ToneOutput {
    // dropping the stream silences the sink
    _stream: OutputStream,
    sink: Sink,
}

impl ToneOutput {
    fn open() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        Ok(Self {
            _stream: stream,
            sink,
        })
    }

    fn play(&self, tone: &Tone) {
        self.sink.append(tone_source(tone));
        // block so the next spoken cue starts after the tone
        self.sink.sleep_until_end();
    }
}

/// Speaks through the platform speech program and synthesizes tones on the
/// default audio device. The device is opened on the first tone, so build
/// the player on the thread that plays it.
pub struct SystemPlayer {
    speech_program: String,
    rate_wpm: u32,
    tones_enabled: bool,
    speech_failed: bool,
    tones_failed: bool,
    tone_output: Option<ToneOutput>,
}

impl SystemPlayer {
    pub fn new(speech_program: impl Into<String>, rate_wpm: u32, tones_enabled: bool) -> Self {
        Self {
            speech_program: speech_program.into(),
            rate_wpm,
            tones_enabled,
            speech_failed: false,
            tones_failed: false,
            tone_output: None,
        }
    }

    /// Command line that speaks `text`. `say` takes `-r`, espeak and most
    /// others take `-s` for words per minute.
    pub fn speech_command(&self, text: &str) -> Command {
        let rate_flag = match Path::new(&self.speech_program)
            .file_name()
            .and_then(|name| name.to_str())
        {
            Some("say") => "-r",
            _ => "-s",
        };
        let mut command = Command::new(&self.speech_program);
        command.arg(rate_flag).arg(self.rate_wpm.to_string()).arg(text);
        command
    }

    fn speak(&mut self, text: &str) {
        if self.speech_failed || text.is_empty() {
            return;
        }
        let command = self.speech_command(text);
        if let Err(err) = run(command) {
            log::warn!("speech program '{}' failed: {err}", self.speech_program);
            self.speech_failed = true;
        }
    }

    fn tone(&mut self, tone: &Tone) {
        if !self.tones_enabled || self.tones_failed {
            return;
        }
        if self.tone_output.is_none() {
            match ToneOutput::open() {
                Ok(output) => {
                    log::info!("tone output opened");
                    self.tone_output = Some(output);
                }
                Err(err) => {
                    log::warn!("{err}; tones disabled");
                    self.tones_failed = true;
                    return;
                }
            }
        }
        if let Some(output) = &self.tone_output {
            output.play(tone);
        }
    }
}

fn run(mut command: Command) -> std::io::Result<()> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|_| ())
}

impl CuePlayer for SystemPlayer {
    fn play(&mut self, request: &CueRequest) {
        for leaf in request.leaves() {
            match leaf {
                CueRequest::Speak(text) => self.speak(text),
                CueRequest::Tone(tone) => self.tone(tone),
                CueRequest::Sequence(_) | CueRequest::Silent => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_speech_rate_flag_by_program() {
        let say = SystemPlayer::new("/usr/bin/say", 250, true);
        assert_eq!(args(&say.speech_command("hi")), vec!["-r", "250", "hi"]);

        let espeak = SystemPlayer::new("espeak", 180, true);
        assert_eq!(args(&espeak.speech_command("hi")), vec!["-s", "180", "hi"]);
    }

    #[test]
    fn test_tone_source_length_and_volume() {
        let tone = Tone::new(440.0, 0.1, 0.5);
        let source = tone_source(&tone);
        let rate = source.sample_rate() as f32;
        assert_eq!(source.channels(), 1);

        let samples: Vec<f32> = source.collect();
        let expected = (rate * tone.duration) as usize;
        assert!(
            samples.len().abs_diff(expected) <= expected / 100,
            "{} samples, expected about {expected}",
            samples.len()
        );
        assert!(samples.iter().all(|s| s.abs() <= tone.volume + 1e-3));
        assert!(samples.iter().any(|s| s.abs() > tone.volume / 2.0));
    }

    #[test]
    fn test_tone_source_fades_to_silence() {
        let tone = Tone::new(660.0, 0.2, 0.8);
        let samples: Vec<f32> = tone_source(&tone).collect();

        let tail = &samples[samples.len() - 50..];
        assert!(tail.iter().all(|s| s.abs() < 0.05 * tone.volume));
        assert!(samples[0].abs() < 1e-3);
    }

    #[test]
    fn test_disabled_tones_never_open_the_device() {
        let mut player = SystemPlayer::new(default_speech_program(), DEFAULT_RATE_WPM, false);

        player.play(&CueRequest::Tone(Tone::new(440.0, 0.1, 0.5)));

        assert!(player.tone_output.is_none());
        assert!(!player.tones_failed);
    }

    #[test]
    fn test_missing_speech_program_disables_speech_only() {
        let mut player = SystemPlayer::new("clack-no-such-speech-program", 300, false);

        player.play(&CueRequest::Sequence(vec![
            CueRequest::speak("hello"),
            CueRequest::speak("again"),
        ]));

        assert!(player.speech_failed);
        assert!(!player.tones_failed);
    }
}
