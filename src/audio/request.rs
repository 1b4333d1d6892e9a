/// A sine tone for the audio backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: f32,
    pub volume: f32,
}

impl Tone {
    pub fn new(frequency: f32, duration: f32, volume: f32) -> Self {
        Self {
            frequency,
            duration,
            volume,
        }
    }
}

// D E F# A B, three octaves above the bass register
pub const PENTATONIC_SCALE: [f32; 5] = [293.333, 329.25, 371.25, 440.0, 495.0];

const INDENT_TONE_DURATION: f32 = 0.15;
const CUE_VOLUME: f32 = 0.5;

const MAX_INDENT_LEVEL: usize = 24;

/// The tone for an indentation depth. Pitch climbs the pentatonic scale and
/// moves up an octave every five levels, topping out at level 24.
pub fn indent_tone(level: usize) -> Tone {
    let level = level.min(MAX_INDENT_LEVEL);
    let note = PENTATONIC_SCALE[level % PENTATONIC_SCALE.len()];
    let octave = (level / PENTATONIC_SCALE.len()) as i32;
    Tone::new(note * 2f32.powi(octave), INDENT_TONE_DURATION, CUE_VOLUME)
}

pub fn chime(frequency: f32, duration: f32) -> Tone {
    Tone::new(frequency, duration, CUE_VOLUME)
}

/// One unit of work for the audio backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CueRequest {
    Speak(String),
    Tone(Tone),
    Sequence(Vec<CueRequest>),
    /// Consumed without sound.
    Silent,
}

impl CueRequest {
    pub fn speak(text: impl Into<String>) -> Self {
        CueRequest::Speak(text.into())
    }

    pub fn is_silent(&self) -> bool {
        match self {
            CueRequest::Silent => true,
            CueRequest::Sequence(parts) => parts.iter().all(CueRequest::is_silent),
            CueRequest::Speak(_) | CueRequest::Tone(_) => false,
        }
    }

    /// Flatten nested sequences into playable leaves.
    pub fn leaves(&self) -> Vec<&CueRequest> {
        match self {
            CueRequest::Sequence(parts) => parts.iter().flat_map(CueRequest::leaves).collect(),
            CueRequest::Silent => Vec::new(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_tone_rises_with_level() {
        let pitches: Vec<f32> = (0..12).map(|level| indent_tone(level).frequency).collect();
        assert!(pitches.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(indent_tone(0).frequency, PENTATONIC_SCALE[0]);
        assert_eq!(indent_tone(5).frequency, PENTATONIC_SCALE[0] * 2.0);
    }

    #[test]
    fn test_leaves_flatten_sequences() {
        let tone = CueRequest::Tone(chime(440.0, 0.1));
        let request = CueRequest::Sequence(vec![
            tone.clone(),
            CueRequest::Silent,
            CueRequest::Sequence(vec![CueRequest::speak("hi")]),
        ]);

        assert_eq!(request.leaves(), vec![&tone, &CueRequest::speak("hi")]);
        assert!(!request.is_silent());
        assert!(CueRequest::Sequence(vec![CueRequest::Silent]).is_silent());
    }
}
