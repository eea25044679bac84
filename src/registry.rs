//! Container format registry.
//!
//! Maps a leading magic byte string to the constructor of a decoder, so a
//! stream of unknown format can be opened with [`open_decoder`]. The WAV
//! format is always available; further formats can be added at run time
//! with [`register_format`].

use parking_lot::{RwLock, const_rwlock};
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

use crate::streaming::traits::Decoder;
use crate::wav::WavDecoder;
use crate::{AudioError, AudioResult};

/// A byte source a registered decoder can be built on.
pub trait Source: Read + Seek + Send {}

impl<T: Read + Seek + Send> Source for T {}

/// Boxed decoder returned by [`open_decoder`].
pub type BoxedDecoder = Box<dyn Decoder + Send>;

/// Constructor of a decoder for one format. The source is positioned at
/// the first byte of the container.
pub type OpenFn = fn(Box<dyn Source>) -> AudioResult<BoxedDecoder>;

/// A container format known to the registry.
#[derive(Debug, Clone, Copy)]
pub struct Format {
    /// Short lowercase name, e.g. `"wav"`.
    pub name: &'static str,
    /// Bytes every stream of this format starts with.
    pub magic: &'static [u8],
    /// Builds the decoder.
    pub open: OpenFn,
}

impl Format {
    fn matches(&self, header: &[u8]) -> bool {
        header.starts_with(self.magic)
    }
}

/// RIFF/WAVE.
pub const WAV: Format = Format {
    name: "wav",
    magic: b"RIFF",
    open: open_wav,
};

static REGISTERED: RwLock<Vec<Format>> = const_rwlock(Vec::new());

fn open_wav(source: Box<dyn Source>) -> AudioResult<BoxedDecoder> {
    Ok(Box::new(WavDecoder::new_seekable(source)?))
}

/// Adds a format. Formats registered later take precedence over earlier
/// ones and over the built-in WAV entry.
pub fn register_format(format: Format) {
    debug!(name = format.name, "Registering format");
    REGISTERED.write().push(format);
}

/// Every known format, in lookup order.
pub fn formats() -> Vec<Format> {
    let registered = REGISTERED.read();
    registered.iter().rev().copied().chain([WAV]).collect()
}

/// Sniffs the leading bytes of `source` and opens it with the matching
/// format.
///
/// Returns the decoder together with the format name.
///
/// # Errors
/// [`AudioError::InvalidData`] if no registered format matches, otherwise
/// whatever the format's constructor reports.
///
/// ```rust
/// use std::io::Cursor;
/// use wavcodec::registry::open_decoder;
/// use wavcodec::wav::WavEncoder;
/// use wavcodec::Config;
///
/// let mut encoder = WavEncoder::new(Cursor::new(Vec::new()), Config::new(1, 8_000).unwrap()).unwrap();
/// encoder.close().unwrap();
///
/// let (decoder, name) = open_decoder(encoder.into_inner().unwrap()).unwrap();
/// assert_eq!(name, "wav");
/// assert_eq!(decoder.config().sample_rate, 8_000);
/// ```
pub fn open_decoder<S: Source + 'static>(mut source: S) -> AudioResult<(BoxedDecoder, &'static str)> {
    let formats = formats();
    let longest = formats.iter().map(|f| f.magic.len()).max().unwrap_or(0);

    let start = source.stream_position()?;
    let mut header = Vec::with_capacity(longest);
    (&mut source).take(longest as u64).read_to_end(&mut header)?;
    source.seek(SeekFrom::Start(start))?;

    let format = formats
        .into_iter()
        .find(|f| f.matches(&header))
        .ok_or_else(|| {
            AudioError::invalid_data(format!(
                "unrecognized stream signature {:02X?}",
                &header[..header.len().min(4)]
            ))
        })?;
    debug!(name = format.name, "Sniffed format");
    let decoder = (format.open)(Box::new(source))?;
    Ok((decoder, format.name))
}

/// Sniffs only: name of the format `header` starts with.
pub fn detect(header: &[u8]) -> Option<&'static str> {
    formats().into_iter().find(|f| f.matches(header)).map(|f| f.name)
}

/// Removes every registered format named `name`.
#[cfg(test)]
fn unregister_format(name: &str) {
    REGISTERED.write().retain(|f| f.name != name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::WavEncoder;
    use crate::{Config, Reader, SliceRef};
    use std::io::Cursor;

    fn wav_bytes() -> Vec<u8> {
        let mut encoder = WavEncoder::new(Cursor::new(Vec::new()), Config::new(2, 22_050).unwrap()).unwrap();
        encoder.write(&SliceRef::from(&[1i16, -1][..])).unwrap();
        encoder.close().unwrap();
        encoder.into_inner().unwrap().into_inner()
    }

    #[test]
    fn test_open_decoder_sniffs_wav() {
        let (mut decoder, name) = open_decoder(Cursor::new(wav_bytes())).unwrap();
        assert_eq!(name, "wav");
        assert_eq!(decoder.config(), Config::new(2, 22_050).unwrap());

        let mut out = [0i16; 2];
        assert_eq!(decoder.read(&mut crate::SliceMut::from(&mut out[..])).unwrap(), 2);
        assert_eq!(out, [1, -1]);
    }

    #[test]
    fn test_open_decoder_rejects_unknown_signature() {
        let result = open_decoder(Cursor::new(b"OggS\0\0\0\0".to_vec()));
        assert!(matches!(result, Err(AudioError::InvalidData(_))));

        let result = open_decoder(Cursor::new(Vec::new()));
        assert!(matches!(result, Err(AudioError::InvalidData(_))));
    }

    #[test]
    fn test_open_decoder_respects_start_position() {
        let mut bytes = vec![0xAA; 3];
        bytes.extend(wav_bytes());
        let mut source = Cursor::new(bytes);
        source.set_position(3);
        let (decoder, _) = open_decoder(source).unwrap();
        assert_eq!(decoder.config().channels, 2);
    }

    /// Unregisters a format when dropped, so a failing assertion does not
    /// leave it in the global table.
    struct Registered(&'static str);

    impl Drop for Registered {
        fn drop(&mut self) {
            unregister_format(self.0);
        }
    }

    #[test]
    fn test_registered_format_is_detected() {
        fn open_fake(_: Box<dyn Source>) -> AudioResult<BoxedDecoder> {
            Err(AudioError::invalid_data("fake format has no decoder"))
        }
        // The magic is unique to this test; no other test input starts with it.
        let _guard = Registered("registry-test-fake");
        register_format(Format {
            name: "registry-test-fake",
            magic: b"\xFFFAKE",
            open: open_fake,
        });
        assert_eq!(detect(b"\xFFFAKE...."), Some("registry-test-fake"));
        assert_eq!(detect(b"RIFF...."), Some("wav"));
        assert_eq!(detect(b"RIF"), None);
        assert!(matches!(
            open_decoder(Cursor::new(b"\xFFFAKEFAKE".to_vec())),
            Err(AudioError::InvalidData(_))
        ));
    }

    #[test]
    fn test_unregister_restores_builtin_table() {
        fn open_other(_: Box<dyn Source>) -> AudioResult<BoxedDecoder> {
            Err(AudioError::invalid_data("no decoder"))
        }
        {
            let _guard = Registered("registry-test-other");
            register_format(Format {
                name: "registry-test-other",
                magic: b"\xFEOTHR",
                open: open_other,
            });
            assert_eq!(detect(b"\xFEOTHR"), Some("registry-test-other"));
        }
        assert_eq!(detect(b"\xFEOTHR"), None);
        assert!(formats().iter().all(|f| f.name != "registry-test-other"));
    }
}
