use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::clamp_unit;
use crate::core::{CircularFrame, CircularOptions, DateUnit, DrawKind, GroupTo, StackingMode};
use crate::error::{ChartError, ChartResult};

pub const SERIES_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Column/bar layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Share of the category band the columns occupy, `[0, 1]`.
    pub width_ratio: f64,
    pub origin: f64,
    /// Category band width in x units; derived from the data when `None`.
    pub band_width: Option<f64>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            width_ratio: 0.8,
            origin: 0.0,
            band_width: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub origin: f64,
}

/// Bubble radii in host units; sizes scale linearly between the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub min_radius: f64,
    pub max_radius: f64,
    pub show_zero_size: bool,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            min_radius: 4.0,
            max_radius: 24.0,
            show_zero_size: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub radius: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self { radius: 3.0 }
    }
}

/// Pie/doughnut parameters. Ratios are fractions of the frame radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularConfig {
    pub layout: CircularOptions,
    pub frame: CircularFrame,
    pub outer_ratio: f64,
    /// Doughnut hole as a fraction of `outer_ratio`; ignored for pies.
    pub inner_ratio: f64,
    pub explode_index: Option<usize>,
    pub explode_all: bool,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            layout: CircularOptions::default(),
            frame: CircularFrame::default(),
            outer_ratio: 0.8,
            inner_ratio: 0.5,
            explode_index: None,
            explode_all: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarConfig {
    /// Angle of the first sample, degrees.
    pub start_angle: f64,
    pub closed: bool,
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            start_angle: -90.0,
            closed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardinalConfig {
    /// Calendar normalization of tangents when x is a date (unix seconds).
    pub date_unit: Option<DateUnit>,
}

/// Everything a host configures on one series.
///
/// Serializable so host applications can persist series setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub draw_kind: DrawKind,
    #[serde(default)]
    pub stacking: StackingMode,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub column: ColumnConfig,
    #[serde(default)]
    pub area: AreaConfig,
    #[serde(default)]
    pub bubble: BubbleConfig,
    #[serde(default)]
    pub scatter: ScatterConfig,
    #[serde(default)]
    pub circular: CircularConfig,
    #[serde(default)]
    pub polar: PolarConfig,
    #[serde(default)]
    pub cardinal: CardinalConfig,
}

impl SeriesConfig {
    #[must_use]
    pub fn new(draw_kind: DrawKind) -> Self {
        Self {
            draw_kind,
            stacking: StackingMode::None,
            group_name: None,
            visible: default_visible(),
            column: ColumnConfig::default(),
            area: AreaConfig::default(),
            bubble: BubbleConfig::default(),
            scatter: ScatterConfig::default(),
            circular: CircularConfig::default(),
            polar: PolarConfig::default(),
            cardinal: CardinalConfig::default(),
        }
    }

    #[must_use]
    pub fn with_stacking(mut self, stacking: StackingMode) -> Self {
        self.stacking = stacking;
        self
    }

    #[must_use]
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: ColumnConfig) -> Self {
        self.column = column;
        self
    }

    #[must_use]
    pub fn with_area(mut self, area: AreaConfig) -> Self {
        self.area = area;
        self
    }

    #[must_use]
    pub fn with_bubble(mut self, bubble: BubbleConfig) -> Self {
        self.bubble = bubble;
        self
    }

    #[must_use]
    pub fn with_scatter(mut self, scatter: ScatterConfig) -> Self {
        self.scatter = scatter;
        self
    }

    #[must_use]
    pub fn with_circular(mut self, circular: CircularConfig) -> Self {
        self.circular = circular;
        self
    }

    /// Sets the circular arc bounds in degrees.
    #[must_use]
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.circular.layout.start_angle = start_angle;
        self.circular.layout.end_angle = end_angle;
        self
    }

    #[must_use]
    pub fn with_group_to(mut self, group_to: GroupTo) -> Self {
        self.circular.layout.group_to = Some(group_to);
        self
    }

    #[must_use]
    pub fn with_polar(mut self, polar: PolarConfig) -> Self {
        self.polar = polar;
        self
    }

    #[must_use]
    pub fn with_cardinal(mut self, cardinal: CardinalConfig) -> Self {
        self.cardinal = cardinal;
        self
    }

    /// Whether this series takes part in a stack group.
    #[must_use]
    pub fn is_stacked(&self) -> bool {
        self.stacking.is_stacked() && self.draw_kind.supports_stacking()
    }

    /// Returns a copy with every out-of-range value clamped.
    ///
    /// Ratios are clamped to `[0, 1]`, thresholds and radii to `>= 0`.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        config.column.width_ratio = clamp_logged("column.width_ratio", self.column.width_ratio, 0.8);
        config.circular.outer_ratio =
            clamp_logged("circular.outer_ratio", self.circular.outer_ratio, 0.8);
        config.circular.inner_ratio =
            clamp_logged("circular.inner_ratio", self.circular.inner_ratio, 0.5);

        if let Some(band_width) = self.column.band_width {
            if !band_width.is_finite() || band_width <= 0.0 {
                warn!(band_width, "ignoring non-positive column band width");
                config.column.band_width = None;
            }
        }

        if let Some(group_to) = config.circular.layout.group_to.as_mut() {
            if group_to.threshold.is_nan() || group_to.threshold < 0.0 {
                warn!(threshold = group_to.threshold, "clamping group-to threshold to zero");
                group_to.threshold = 0.0;
            }
        }

        if config.circular.frame.radius.is_nan() || config.circular.frame.radius < 0.0 {
            warn!(radius = config.circular.frame.radius, "clamping circular frame radius to zero");
            config.circular.frame.radius = 0.0;
        }

        config.scatter.radius = non_negative_logged("scatter.radius", self.scatter.radius);
        config.bubble.min_radius = non_negative_logged("bubble.min_radius", self.bubble.min_radius);
        config.bubble.max_radius = non_negative_logged("bubble.max_radius", self.bubble.max_radius);
        if config.bubble.min_radius > config.bubble.max_radius {
            warn!(
                min_radius = config.bubble.min_radius,
                max_radius = config.bubble.max_radius,
                "swapping inverted bubble radius bounds"
            );
            std::mem::swap(&mut config.bubble.min_radius, &mut config.bubble.max_radius);
        }

        if self.stacking.is_stacked() && !self.draw_kind.supports_stacking() {
            warn!(draw_kind = ?self.draw_kind, "stacking is ignored for this draw kind");
        }

        config
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize series config: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = SeriesConfigJsonContractV1 {
            schema_version: SERIES_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize series config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a versioned contract envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(config) = serde_json::from_str::<SeriesConfig>(input) {
            return Ok(config);
        }
        let payload: SeriesConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse series config json payload: {e}"))
        })?;
        if payload.schema_version != SERIES_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidConfig(format!(
                "unsupported series config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: SeriesConfig,
}

fn default_visible() -> bool {
    true
}

fn clamp_logged(field: &'static str, value: f64, fallback: f64) -> f64 {
    let clamped = clamp_unit(value, fallback);
    if clamped != value {
        warn!(field, value, clamped, "clamping ratio into [0, 1]");
    }
    clamped
}

fn non_negative_logged(field: &'static str, value: f64) -> f64 {
    if value >= 0.0 {
        return value;
    }
    warn!(field, value, "clamping negative radius to zero");
    0.0
}
