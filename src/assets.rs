use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use rodio::Source;

use crate::pet::animation::{SoundCue, SpriteKey};

/// Files embedded into the binary, keyed by filename.
pub const BUNDLE: &[(&str, &[u8])] = &[
    ("0.png", include_bytes!("../assets/0.png")),
    ("1.png", include_bytes!("../assets/1.png")),
    ("2.png", include_bytes!("../assets/2.png")),
    ("3.png", include_bytes!("../assets/3.png")),
    ("4.png", include_bytes!("../assets/4.png")),
    ("5.png", include_bytes!("../assets/5.png")),
    ("6.png", include_bytes!("../assets/6.png")),
    ("7.png", include_bytes!("../assets/7.png")),
    ("wait0.png", include_bytes!("../assets/wait0.png")),
    ("wait1.png", include_bytes!("../assets/wait1.png")),
    ("rest.wav", include_bytes!("../assets/rest.wav")),
    ("alert.wav", include_bytes!("../assets/alert.wav")),
    ("contact.wav", include_bytes!("../assets/contact.wav")),
];

/// Decoded image, straight (non-premultiplied) RGBA8.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decoded audio clip, interleaved f32 PCM.
#[derive(Debug, Clone)]
pub struct SoundClip {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

/// Every decoded sprite and sound, keyed by filename stem.
#[derive(Debug, Default)]
pub struct AssetBundle {
    sprites: HashMap<String, Sprite>,
    sounds: HashMap<String, SoundClip>,
}

impl AssetBundle {
    pub fn sprite(&self, key: SpriteKey) -> Option<&Sprite> {
        self.sprites.get(key.name())
    }

    pub fn sound(&self, cue: SoundCue) -> Option<&SoundClip> {
        self.sounds.get(cue.name())
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Every sprite key and sound cue the pet can ask for must be present.
    fn check_complete(&self) -> Result<(), AssetError> {
        let sprites = SpriteKey::ALL.iter().map(|k| (k.name(), self.sprites.contains_key(k.name())));
        let sounds = SoundCue::ALL.iter().map(|c| (c.name(), self.sounds.contains_key(c.name())));
        match sprites.chain(sounds).find(|(_, present)| !present) {
            Some((name, _)) => Err(AssetError::Missing {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub enum AssetError {
    /// A bundled file could not be decoded.
    Decode {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A sprite or sound the pet needs is not in the bundle.
    Missing { name: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Decode { name, source } => {
                write!(f, "failed to decode asset '{name}': {source}")
            }
            AssetError::Missing { name } => write!(f, "required asset '{name}' is missing"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Decode { source, .. } => Some(source.as_ref()),
            AssetError::Missing { .. } => None,
        }
    }
}

/// Decode a set of `(filename, bytes)` pairs. PNG files become sprites, WAV
/// files become sounds, anything else is skipped.
pub fn load(files: &[(&str, &[u8])]) -> Result<AssetBundle, AssetError> {
    let mut bundle = AssetBundle::default();

    for &(file, bytes) in files {
        let path = Path::new(file);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file)
            .to_string();

        match path.extension().and_then(|e| e.to_str()) {
            Some("png") => {
                let sprite = decode_sprite(bytes).map_err(|e| AssetError::Decode {
                    name: file.to_string(),
                    source: Box::new(e),
                })?;
                bundle.sprites.insert(stem, sprite);
            }
            Some("wav") => {
                let clip = decode_sound(bytes).map_err(|e| AssetError::Decode {
                    name: file.to_string(),
                    source: Box::new(e),
                })?;
                bundle.sounds.insert(stem, clip);
            }
            _ => log::debug!("Skipping unrecognised asset {file}"),
        }
    }

    bundle.check_complete()?;
    Ok(bundle)
}

fn decode_sprite(bytes: &[u8]) -> Result<Sprite, image::ImageError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(Sprite {
        width,
        height,
        rgba: image.into_raw(),
    })
}

fn decode_sound(bytes: &[u8]) -> Result<SoundClip, rodio::decoder::DecoderError> {
    let decoder = rodio::Decoder::new(Cursor::new(bytes.to_vec()))?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples().collect();
    Ok(SoundClip {
        channels,
        sample_rate,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 128]));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    /// 16-bit PCM mono WAV with `samples` frames.
    fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn embedded_bundle_is_complete() {
        let bundle = load(BUNDLE).expect("embedded assets decode");
        for key in SpriteKey::ALL {
            let sprite = bundle.sprite(key).expect("sprite present");
            assert_eq!(sprite.rgba.len(), (sprite.width * sprite.height * 4) as usize);
        }
        for cue in SoundCue::ALL {
            assert!(!bundle.sound(cue).expect("sound present").samples.is_empty());
        }
    }

    #[test]
    fn decodes_png_to_rgba() {
        let sprite = decode_sprite(&png_bytes(3, 2)).expect("decode");
        assert_eq!((sprite.width, sprite.height), (3, 2));
        assert_eq!(sprite.rgba.len(), 3 * 2 * 4);
        assert_eq!(&sprite.rgba[..4], &[255, 0, 0, 128]);
    }

    #[test]
    fn decodes_wav_to_pcm() {
        let clip = decode_sound(&wav_bytes(&[0, 1000, -1000, 0, 500], 8000)).expect("decode");
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.sample_rate, 8000);
        assert_eq!(clip.samples.len(), 5);
    }

    #[test]
    fn corrupt_file_names_the_asset() {
        let files: &[(&str, &[u8])] = &[("0.png", b"definitely not a png")];
        match load(files) {
            Err(AssetError::Decode { name, .. }) => assert_eq!(name, "0.png"),
            other => panic!("expected decode error, got {other:?}"),
        }

        let files: &[(&str, &[u8])] = &[("rest.wav", b"RIFF")];
        assert!(matches!(load(files), Err(AssetError::Decode { .. })));
    }

    #[test]
    fn decode_error_keeps_its_cause() {
        use std::error::Error;

        let files: &[(&str, &[u8])] = &[("0.png", b"definitely not a png")];
        let err = load(files).expect_err("corrupt png");
        let source = err.source().expect("decode error has a source");
        assert!(source.downcast_ref::<image::ImageError>().is_some());

        let files: &[(&str, &[u8])] = &[("rest.wav", b"RIFF")];
        let err = load(files).expect_err("truncated wav");
        let source = err.source().expect("decode error has a source");
        assert!(source.downcast_ref::<rodio::decoder::DecoderError>().is_some());

        let missing = AssetError::Missing {
            name: "rest".to_string(),
        };
        assert!(missing.source().is_none());
    }

    #[test]
    fn missing_key_is_reported() {
        let files: Vec<(&str, &[u8])> = BUNDLE
            .iter()
            .copied()
            .filter(|(name, _)| *name != "contact.wav")
            .collect();
        match load(&files) {
            Err(AssetError::Missing { name }) => assert_eq!(name, "contact"),
            other => panic!("expected missing asset, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extensions_are_skipped() {
        let mut files: Vec<(&str, &[u8])> = BUNDLE.to_vec();
        files.push(("README.txt", b"hello"));
        let bundle = load(&files).expect("load");
        assert_eq!(bundle.sprite_count(), SpriteKey::ALL.len());
        assert_eq!(bundle.sound_count(), SoundCue::ALL.len());
    }
}
