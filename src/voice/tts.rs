//! Text-to-speech through a local espeak-ng process

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::{SpeechEngine, VoiceInfo};
use crate::session::TtsSettings;
use crate::{Error, Result};

/// Binaries tried in order when no explicit path is configured
const CANDIDATE_BINARIES: [&str; 2] = ["espeak-ng", "espeak"];

/// Upper bound on a single utterance
const SPEAK_TIMEOUT: Duration = Duration::from_secs(120);

/// Speaks through an espeak-ng compatible binary
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    binary: PathBuf,
}

impl EspeakEngine {
    /// Use a specific binary
    #[must_use]
    pub const fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Find a usable binary: the explicit path if it resolves, else PATH lookup
    #[must_use]
    pub fn locate(explicit: Option<&Path>) -> Option<Self> {
        if let Some(path) = explicit {
            return match which::which(path) {
                Ok(found) => Some(Self::new(found)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "configured TTS engine not found");
                    None
                }
            };
        }

        CANDIDATE_BINARIES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
    }

    /// Path of the binary in use
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Command-line arguments for one utterance
    #[must_use]
    pub fn speak_args(text: &str, settings: &TtsSettings) -> Vec<String> {
        // espeak amplitude: 0-200, 100 is its normal level
        let amplitude = (settings.volume.clamp(0.0, 1.0) * 100.0).round();

        let mut args = vec![
            "-s".to_string(),
            settings.rate.to_string(),
            "-a".to_string(),
            format!("{amplitude:.0}"),
        ];
        if let Some(voice) = &settings.voice_id {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("--".to_string());
        args.push(speakable(text));
        args
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &'static str {
        "espeak"
    }

    async fn speak(&self, text: &str, settings: &TtsSettings) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let child = Command::new(&self.binary)
            .args(Self::speak_args(text, settings))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Tts(format!("failed to start {}: {e}", self.binary.display())))?;

        let output = timeout(SPEAK_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| Error::Tts(format!("speech timed out after {SPEAK_TIMEOUT:?}")))??;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Tts(format!("espeak exited with code {code}: {}", stderr.trim())));
        }

        tracing::debug!(
            chars = text.len(),
            rate = settings.rate,
            voice = ?settings.voice_id,
            "spoke reply"
        );
        Ok(())
    }

    async fn voices(&self) -> Result<Vec<VoiceInfo>> {
        let output = Command::new(&self.binary)
            .arg("--voices")
            .output()
            .await
            .map_err(|e| Error::Tts(format!("failed to list voices: {e}")))?;

        if !output.status.success() {
            return Err(Error::Tts(format!(
                "voice listing exited with code {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `espeak --voices` output
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File          Other Languages
///  5  en-us           --/M      English_(America)  gmw/en-US     (en 3)
/// ```
#[must_use]
pub fn parse_voice_list(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let _priority = fields.next()?;
            let id = fields.next()?;
            let age_gender = fields.next()?;
            let name = fields.next()?;

            let gender = age_gender
                .rsplit('/')
                .next()
                .filter(|g| !g.is_empty() && *g != "-" && *g != "--")
                .map(ToString::to_string);

            Some(VoiceInfo {
                id: id.to_string(),
                name: name.replace('_', " "),
                gender,
            })
        })
        .collect()
}

/// Strip markdown emphasis that would otherwise be read aloud
#[must_use]
pub fn speakable(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '`' | '#'))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  fr-fr           --/F      French_(France)    roa/fr               (fr 5)
";

    #[test]
    fn parses_voice_table() {
        let voices = parse_voice_list(VOICES);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].id, "en-us");
        assert_eq!(voices[1].name, "English (America)");
        assert_eq!(voices[1].gender.as_deref(), Some("M"));
        assert_eq!(voices[2].gender.as_deref(), Some("F"));
    }

    #[test]
    fn garbage_output_gives_no_voices() {
        assert!(parse_voice_list("espeak: command failed").is_empty());
    }

    #[test]
    fn args_carry_rate_volume_and_voice() {
        let settings = TtsSettings::new(180, 0.5, Some("en-gb".to_string()));
        let args = EspeakEngine::speak_args("**Hello** there", &settings);
        assert_eq!(
            args,
            vec!["-s", "180", "-a", "50", "-v", "en-gb", "--", "Hello there"]
        );
    }

    #[test]
    fn default_voice_omits_flag() {
        let args = EspeakEngine::speak_args("-dash first", &TtsSettings::default());
        assert!(!args.contains(&"-v".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-dash first"));
    }

    #[test]
    fn missing_explicit_binary_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EspeakEngine::locate(Some(&dir.path().join("no-such-tts"))).is_none());
    }
}
