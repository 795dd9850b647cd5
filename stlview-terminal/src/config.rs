/// Attribute-driven viewer configuration
use thiserror::Error;

/// Fatal configuration problems raised at mount
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("model attribute is required")]
    MissingModel,
}

/// Auto-rotation policy derived from the `autorotate` attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoRotate {
    /// No rotation
    Off,
    /// Rotate at the given speed until the viewer is unmounted
    Continuous(f32),
    /// Rotate at the given speed until the first user interaction
    InitialOnly(f32),
}

pub const DEFAULT_ROTATE_SPEED: f32 = 1.0;

/// Viewer configuration, read once from attributes at mount
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub model_source: String,
    pub auto_rotate: AutoRotate,
}

impl ViewerConfig {
    /// Derive a configuration from `(name, value)` attribute pairs.
    ///
    /// The `model` attribute is required. For `autorotate`:
    /// - absent: rotation off
    /// - `"initial"`: default speed, disabled on first interaction
    /// - a finite number: continuous rotation at that speed
    /// - anything else (including empty): continuous at the default speed
    ///
    /// The first occurrence of a repeated attribute wins.
    pub fn from_attributes<'a, I>(attrs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut model = None;
        let mut autorotate = None;

        for (name, value) in attrs {
            match name {
                "model" if model.is_none() => model = Some(value.to_string()),
                "autorotate" if autorotate.is_none() => autorotate = Some(value.to_string()),
                _ => {}
            }
        }

        let model_source = model.ok_or(ConfigError::MissingModel)?;

        let auto_rotate = match autorotate.as_deref() {
            None => AutoRotate::Off,
            Some("initial") => AutoRotate::InitialOnly(DEFAULT_ROTATE_SPEED),
            Some(value) => match value.parse::<f32>() {
                Ok(speed) if speed.is_finite() => AutoRotate::Continuous(speed),
                _ => AutoRotate::Continuous(DEFAULT_ROTATE_SPEED),
            },
        };

        Ok(Self {
            model_source,
            auto_rotate,
        })
    }
}
