//! Value encoding: metric to column height and fill color.

use formats::FacilityRecord;
use foundation::color::{Rgb, Rgba, channel_from_f64};
use serde::{Deserialize, Serialize};

/// Wait-time palette, hottest first.
pub mod palette {
    use foundation::color::Rgb;

    pub const COLOR_1: Rgb = Rgb::new(225, 83, 131);
    pub const COLOR_2: Rgb = Rgb::new(241, 109, 122);
    pub const COLOR_3: Rgb = Rgb::new(250, 138, 118);
    pub const COLOR_4: Rgb = Rgb::new(255, 166, 121);
    pub const COLOR_5: Rgb = Rgb::new(255, 194, 133);
    pub const COLOR_6: Rgb = Rgb::new(255, 221, 154);
    pub const OTHER: Rgb = Rgb::new(254, 246, 181);

    /// Six-step diverging range for aggregated layers.
    pub const COLOR_RANGE: [Rgb; 6] = [
        Rgb::new(1, 152, 189),
        Rgb::new(73, 227, 206),
        Rgb::new(216, 254, 181),
        Rgb::new(254, 237, 177),
        Rgb::new(254, 173, 84),
        Rgb::new(209, 55, 78),
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbologyError {
    NonFiniteThreshold(f64),
    DuplicateThreshold(f64),
    ChannelOutOfRange(usize),
}

impl std::fmt::Display for SymbologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbologyError::NonFiniteThreshold(t) => write!(f, "color threshold {t} is not finite"),
            SymbologyError::DuplicateThreshold(t) => {
                write!(f, "color threshold {t} appears more than once")
            }
            SymbologyError::ChannelOutOfRange(c) => {
                write!(f, "color channel {c} is out of range (0..=3)")
            }
        }
    }
}

impl std::error::Error for SymbologyError {}

/// `elevation = (value - baseline) * scale_factor`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationEncoding {
    pub baseline: f64,
    pub scale_factor: f64,
}

impl ElevationEncoding {
    pub const fn new(baseline: f64, scale_factor: f64) -> Self {
        Self {
            baseline,
            scale_factor,
        }
    }

    /// Non-finite input (or a non-finite product) yields 0, the height
    /// columns enter from.
    pub fn elevation(&self, value: f64) -> f64 {
        let e = (value - self.baseline) * self.scale_factor;
        if e.is_finite() { e } else { 0.0 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBucket {
    /// Exclusive lower bound: the bucket matches values strictly above it.
    pub threshold: f64,
    pub color: Rgb,
}

impl ColorBucket {
    pub const fn new(threshold: f64, color: Rgb) -> Self {
        Self { threshold, color }
    }
}

/// Threshold color classes.
///
/// Buckets are held in strictly descending threshold order; the first bucket
/// whose threshold the value exceeds wins, and `fallback` covers everything
/// else, NaN included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorBucketsRepr", into = "ColorBucketsRepr")]
pub struct ColorBuckets {
    buckets: Vec<ColorBucket>,
    fallback: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColorBucketsRepr {
    buckets: Vec<ColorBucket>,
    fallback: Rgb,
}

impl TryFrom<ColorBucketsRepr> for ColorBuckets {
    type Error = SymbologyError;

    fn try_from(repr: ColorBucketsRepr) -> Result<Self, Self::Error> {
        ColorBuckets::new(repr.buckets, repr.fallback)
    }
}

impl From<ColorBuckets> for ColorBucketsRepr {
    fn from(b: ColorBuckets) -> Self {
        Self {
            buckets: b.buckets,
            fallback: b.fallback,
        }
    }
}

impl ColorBuckets {
    /// Sorts `buckets` into descending order. Rejects NaN/infinite and
    /// repeated thresholds, which would make the first-match rule ambiguous.
    pub fn new(mut buckets: Vec<ColorBucket>, fallback: Rgb) -> Result<Self, SymbologyError> {
        if let Some(b) = buckets.iter().find(|b| !b.threshold.is_finite()) {
            return Err(SymbologyError::NonFiniteThreshold(b.threshold));
        }
        buckets.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        if let Some(pair) = buckets.windows(2).find(|w| w[0].threshold == w[1].threshold) {
            return Err(SymbologyError::DuplicateThreshold(pair[0].threshold));
        }
        Ok(Self { buckets, fallback })
    }

    /// Median wait-time classes: `> 220, > 200, ..., > 120`, then `OTHER`.
    pub fn wait_times() -> Self {
        use palette::*;
        Self {
            buckets: vec![
                ColorBucket::new(220.0, COLOR_1),
                ColorBucket::new(200.0, COLOR_2),
                ColorBucket::new(180.0, COLOR_3),
                ColorBucket::new(160.0, COLOR_4),
                ColorBucket::new(140.0, COLOR_5),
                ColorBucket::new(120.0, COLOR_6),
            ],
            fallback: OTHER,
        }
    }

    pub fn color_for(&self, value: f64) -> Rgb {
        self.buckets
            .iter()
            .find(|b| value > b.threshold)
            .map(|b| b.color)
            .unwrap_or(self.fallback)
    }

    pub fn buckets(&self) -> &[ColorBucket] {
        &self.buckets
    }

    pub fn fallback(&self) -> Rgb {
        self.fallback
    }
}

/// How a record's metric turns into a fill color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ColorEncoding {
    Buckets(ColorBuckets),
    /// `base` with one channel replaced by `value * scale`, saturating.
    ChannelRamp { base: Rgba, channel: usize, scale: f64 },
}

impl ColorEncoding {
    /// The `[48, 128, value * 255, 255]` ramp.
    pub const fn blue_ramp() -> Self {
        ColorEncoding::ChannelRamp {
            base: Rgba::new(48, 128, 0, 255),
            channel: 2,
            scale: 255.0,
        }
    }

    pub fn validate(&self) -> Result<(), SymbologyError> {
        match self {
            ColorEncoding::Buckets(_) => Ok(()),
            ColorEncoding::ChannelRamp { channel, .. } if *channel > 3 => {
                Err(SymbologyError::ChannelOutOfRange(*channel))
            }
            ColorEncoding::ChannelRamp { .. } => Ok(()),
        }
    }

    pub fn color_for(&self, value: f64) -> Rgba {
        match self {
            ColorEncoding::Buckets(buckets) => buckets.color_for(value).into(),
            ColorEncoding::ChannelRamp {
                base,
                channel,
                scale,
            } => {
                let mut out = *base;
                if let Some(c) = out.0.get_mut(*channel) {
                    *c = channel_from_f64(value * scale);
                }
                out
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedValue {
    pub elevation: f64,
    pub fill_color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEncoder {
    pub elevation: ElevationEncoding,
    pub color: ColorEncoding,
}

impl ValueEncoder {
    pub fn new(elevation: ElevationEncoding, color: ColorEncoding) -> Self {
        Self { elevation, color }
    }

    pub fn elevation(&self, value: f64) -> f64 {
        self.elevation.elevation(value)
    }

    pub fn color_for(&self, value: f64) -> Rgba {
        self.color.color_for(value)
    }

    pub fn encode(&self, record: &FacilityRecord) -> EncodedValue {
        let value = record.metric();
        EncodedValue {
            elevation: self.elevation(value),
            fill_color: self.color_for(value),
        }
    }
}
