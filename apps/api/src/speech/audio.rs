//! Uploaded audio clips and container format detection.

use bytes::Bytes;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Webm,
    Ogg,
    Flac,
    Mp4,
}

impl AudioFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Webm => "audio/webm",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Mp4 => "audio/mp4",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Webm => "webm",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
            AudioFormat::Mp4 => "m4a",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        // Browsers send e.g. "audio/webm;codecs=opus"
        let essence = mime.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/ogg" | "application/ogg" => Some(Self::Ogg),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "video/mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    fn from_extension(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "webm" => Some(Self::Webm),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            "m4a" | "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Self::Wav),
            [b'I', b'D', b'3', ..] => Some(Self::Mp3),
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Some(Self::Mp3),
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Some(Self::Webm),
            [b'O', b'g', b'g', b'S', ..] => Some(Self::Ogg),
            [b'f', b'L', b'a', b'C', ..] => Some(Self::Flac),
            [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some(Self::Mp4),
            _ => None,
        }
    }

    /// Content type first, then file extension, then magic bytes.
    /// A generic `application/octet-stream` content type is ignored.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>, data: &[u8]) -> Option<Self> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| file_name.and_then(Self::from_extension))
            .or_else(|| Self::sniff(data))
    }
}

/// One uploaded clip, alive for a single request.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl AudioClip {
    pub fn format(&self) -> Option<AudioFormat> {
        AudioFormat::detect(
            self.content_type.as_deref(),
            self.file_name.as_deref(),
            &self.data,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAV_HEADER: &[u8] = b"RIFF\x24\x08\x00\x00WAVEfmt ";

    #[test]
    fn test_detect_from_content_type_with_params() {
        let format = AudioFormat::detect(Some("audio/webm;codecs=opus"), None, b"");
        assert_eq!(format, Some(AudioFormat::Webm));
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        let format =
            AudioFormat::detect(Some("application/octet-stream"), Some("question.M4A"), b"");
        assert_eq!(format, Some(AudioFormat::Mp4));
    }

    #[test]
    fn test_detect_falls_back_to_magic_bytes() {
        assert_eq!(
            AudioFormat::detect(None, Some("blob"), WAV_HEADER),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::detect(None, None, b"ID3\x04\x00"),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(
            AudioFormat::detect(None, None, b"OggS\x00\x02"),
            Some(AudioFormat::Ogg)
        );
        assert_eq!(
            AudioFormat::detect(None, None, b"\x00\x00\x00\x20ftypM4A "),
            Some(AudioFormat::Mp4)
        );
    }

    #[test]
    fn test_unknown_data_is_none() {
        assert_eq!(
            AudioFormat::detect(Some("text/plain"), Some("notes.txt"), b"hello world"),
            None
        );
    }

    #[test]
    fn test_clip_format_and_emptiness() {
        let clip = AudioClip {
            data: Bytes::from_static(WAV_HEADER),
            content_type: None,
            file_name: None,
        };
        assert_eq!(clip.format(), Some(AudioFormat::Wav));
        assert!(!clip.is_empty());
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
    }
}
