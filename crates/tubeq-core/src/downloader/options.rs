//! Downloader invocation for one record and mode.

use std::fmt;
use std::path::Path;

use crate::url_model::{Mode, UrlRecord};

/// Placeholder template used when the record has no custom name.
pub const TITLE_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Flags that make the downloader extract an mp3 and keep the original.
pub const AUDIO_ARGS: [&str; 4] = ["--extract-audio", "--audio-format", "mp3", "-k"];

/// Fully assembled child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub mode: Mode,
    pub program: String,
    pub args: Vec<String>,
    /// Output path template passed via `-o`.
    pub output_template: String,
}

impl DownloadOptions {
    /// Builds the invocation for `record` in `mode`, writing into `downloading`.
    ///
    /// With a custom name the template is `<downloading>/<name>.%(ext)s`
    /// (audio: `<downloading>/<name>.mp3`); otherwise the downloader's title
    /// placeholder is used. `extra_args` go before the URL.
    pub fn build(
        record: &UrlRecord,
        mode: Mode,
        downloading: &Path,
        program: &str,
        extra_args: &[String],
    ) -> Self {
        let file_template = match (record.custom_name(), mode) {
            (Some(name), Mode::Video) => format!("{}.%(ext)s", name),
            (Some(name), Mode::Audio) => format!("{}.mp3", name),
            (None, _) => TITLE_TEMPLATE.to_string(),
        };
        let output_template = downloading.join(file_template).to_string_lossy().into_owned();

        let mut args = vec!["-o".to_string(), output_template.clone()];
        if mode == Mode::Audio {
            args.extend(AUDIO_ARGS.iter().map(|s| s.to_string()));
        }
        args.extend(extra_args.iter().cloned());
        args.push(record.url().to_string());

        Self {
            mode,
            program: program.to_string(),
            args,
            output_template,
        }
    }

    /// Command line as one string, for logs and `tubeq list --commands`.
    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UrlRecord {
        UrlRecord::with_overrides("https://example.com/v", "myvideo", "clips")
    }

    #[test]
    fn custom_name_video_template() {
        let o = DownloadOptions::build(&record(), Mode::Video, Path::new("dl"), "yt-dlp", &[]);
        assert_eq!(o.output_template, "dl/myvideo.%(ext)s");
        assert_eq!(o.args, vec!["-o", "dl/myvideo.%(ext)s", "https://example.com/v"]);
    }

    #[test]
    fn custom_name_audio_forces_mp3() {
        let o = DownloadOptions::build(&record(), Mode::Audio, Path::new("dl"), "yt-dlp", &[]);
        assert_eq!(o.output_template, "dl/myvideo.mp3");
        assert_eq!(
            o.args,
            vec![
                "-o",
                "dl/myvideo.mp3",
                "--extract-audio",
                "--audio-format",
                "mp3",
                "-k",
                "https://example.com/v"
            ]
        );
    }

    #[test]
    fn no_name_falls_back_to_title() {
        let r = UrlRecord::new("https://example.com/w");
        let video = DownloadOptions::build(&r, Mode::Video, Path::new("dl"), "yt-dlp", &[]);
        let audio = DownloadOptions::build(&r, Mode::Audio, Path::new("dl"), "yt-dlp", &[]);
        assert_eq!(video.output_template, "dl/%(title)s.%(ext)s");
        assert_eq!(audio.output_template, "dl/%(title)s.%(ext)s");
    }

    #[test]
    fn extra_args_precede_url() {
        let extra = vec!["--restrict-filenames".to_string()];
        let o = DownloadOptions::build(&record(), Mode::Video, Path::new("dl"), "yt-dlp", &extra);
        assert_eq!(o.args.last().map(String::as_str), Some("https://example.com/v"));
        assert_eq!(o.args[2], "--restrict-filenames");
    }

    #[test]
    fn command_line_quotes_whitespace() {
        let o = DownloadOptions::build(
            &record(),
            Mode::Video,
            Path::new("my downloads"),
            "yt-dlp",
            &[],
        );
        assert_eq!(
            o.command_line(),
            "yt-dlp -o 'my downloads/myvideo.%(ext)s' https://example.com/v"
        );
    }
}
