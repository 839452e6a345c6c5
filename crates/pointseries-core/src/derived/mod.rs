//! Derived variables: which bands feed which formula, and where in the
//! pipeline the formula runs.

pub mod formula;

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DIFFUSE_FRACTION;
use crate::error::{Result, SeriesError};
use crate::record::Band;

/// The variables the pipeline knows how to derive, with their input bands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variable {
    /// NDVI → LAI from near-infrared and red reflectance.
    Lai {
        #[serde(default = "default_nir")]
        nir: String,
        #[serde(default = "default_red")]
        red: String,
    },
    /// Black-sky / white-sky shortwave albedo blend.
    BlendedAlbedo {
        #[serde(default = "default_bsa")]
        bsa: String,
        #[serde(default = "default_wsa")]
        wsa: String,
    },
    /// Black-sky shortwave albedo alone.
    SingleAlbedo {
        #[serde(default = "default_bsa")]
        bsa: String,
    },
    /// Net over downward surface solar radiation.
    ClearSkyIndex {
        #[serde(default = "default_net")]
        net: String,
        #[serde(default = "default_downward")]
        downward: String,
    },
}

fn default_nir() -> String {
    "B8".into()
}
fn default_red() -> String {
    "B4".into()
}
fn default_bsa() -> String {
    "Albedo_BSA_shortwave".into()
}
fn default_wsa() -> String {
    "Albedo_WSA_shortwave".into()
}
fn default_net() -> String {
    "surface_net_solar_radiation".into()
}
fn default_downward() -> String {
    "surface_solar_radiation_downwards".into()
}

impl Variable {
    pub fn lai() -> Self {
        Self::Lai {
            nir: default_nir(),
            red: default_red(),
        }
    }

    pub fn blended_albedo() -> Self {
        Self::BlendedAlbedo {
            bsa: default_bsa(),
            wsa: default_wsa(),
        }
    }

    pub fn single_albedo() -> Self {
        Self::SingleAlbedo { bsa: default_bsa() }
    }

    pub fn clear_sky_index() -> Self {
        Self::ClearSkyIndex {
            net: default_net(),
            downward: default_downward(),
        }
    }

    /// Name of the output column.
    pub fn output_name(&self) -> &'static str {
        match self {
            Self::Lai { .. } => "LAI",
            Self::BlendedAlbedo { .. } | Self::SingleAlbedo { .. } => "albedo",
            Self::ClearSkyIndex { .. } => "clear_sky_index",
        }
    }

    /// Input band names, in the order `evaluate` expects their values.
    pub fn input_bands(&self) -> Vec<&str> {
        match self {
            Self::Lai { nir, red } => vec![nir.as_str(), red.as_str()],
            Self::BlendedAlbedo { bsa, wsa } => vec![bsa.as_str(), wsa.as_str()],
            Self::SingleAlbedo { bsa } => vec![bsa.as_str()],
            Self::ClearSkyIndex { net, downward } => vec![net.as_str(), downward.as_str()],
        }
    }

    /// Where the formula runs unless configured otherwise.
    pub fn default_evaluation(&self) -> EvaluationOrder {
        match self {
            Self::ClearSkyIndex { .. } => EvaluationOrder::PerReducedScalar,
            _ => EvaluationOrder::PerPixel,
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lai { nir, red } => write!(f, "LAI (NIR={nir}, Red={red})"),
            Self::BlendedAlbedo { bsa, wsa } => write!(f, "Blended albedo ({bsa}, {wsa})"),
            Self::SingleAlbedo { bsa } => write!(f, "Single-band albedo ({bsa})"),
            Self::ClearSkyIndex { net, downward } => {
                write!(f, "Clear-sky index ({net} / {downward})")
            }
        }
    }
}

/// Whether a formula is applied to every pixel before the spatial reduction
/// or to the reduced input scalars after it. The two agree for a single-pixel
/// reduction and differ for non-linear formulas over larger footprints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOrder {
    #[default]
    PerPixel,
    PerReducedScalar,
}

impl std::fmt::Display for EvaluationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerPixel => write!(f, "Per pixel"),
            Self::PerReducedScalar => write!(f, "Per reduced scalar"),
        }
    }
}

/// A named formula over named input bands, ready to evaluate.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedVariableSpec {
    pub variable: Variable,
    pub diffuse_fraction: f64,
    pub evaluation: EvaluationOrder,
}

impl DerivedVariableSpec {
    pub fn new(variable: Variable) -> Self {
        let evaluation = variable.default_evaluation();
        Self {
            variable,
            diffuse_fraction: DEFAULT_DIFFUSE_FRACTION,
            evaluation,
        }
    }

    pub fn with_diffuse_fraction(mut self, f: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&f) {
            return Err(SeriesError::Configuration(format!(
                "diffuse_fraction {f} outside [0, 1]"
            )));
        }
        self.diffuse_fraction = f;
        Ok(self)
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationOrder) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn output_name(&self) -> &'static str {
        self.variable.output_name()
    }

    pub fn input_bands(&self) -> Vec<&str> {
        self.variable.input_bands()
    }

    /// Apply the formula to input values given in `input_bands` order.
    pub fn evaluate(&self, inputs: &[f64]) -> Option<f64> {
        match (&self.variable, inputs) {
            (Variable::Lai { .. }, [nir, red]) => formula::lai(*nir, *red),
            (Variable::BlendedAlbedo { .. }, [bsa, wsa]) => {
                formula::blended_albedo(*bsa, *wsa, self.diffuse_fraction)
            }
            (Variable::SingleAlbedo { .. }, [bsa]) => formula::single_albedo(*bsa),
            (Variable::ClearSkyIndex { .. }, [net, downward]) => {
                formula::clear_sky_index(*net, *downward)
            }
            _ => None,
        }
    }

    /// Apply the formula to reduced input scalars. Any missing input makes
    /// the result missing.
    pub fn evaluate_reduced(&self, inputs: &[Option<f64>]) -> Option<f64> {
        let values: Option<Vec<f64>> = inputs.iter().copied().collect();
        self.evaluate(&values?)
    }

    /// Apply the formula pixel by pixel. Masked inputs and undefined results
    /// become NaN in the derived band.
    pub fn derive_band(&self, bands: &[Band]) -> Result<Band> {
        let Some(first) = bands.first() else {
            return Err(SeriesError::Configuration(
                "derived band needs at least one input".into(),
            ));
        };
        let shape = first.data.dim();
        if let Some(other) = bands.iter().find(|b| b.data.dim() != shape) {
            return Err(SeriesError::Configuration(format!(
                "input bands differ in shape: {:?} vs {:?}",
                shape,
                other.data.dim()
            )));
        }

        let mut out = Array2::<f64>::from_elem(shape, f64::NAN);
        let mut inputs = Vec::with_capacity(bands.len());
        Zip::indexed(&mut out).for_each(|(row, col), v| {
            inputs.clear();
            for band in bands {
                match band.value(row, col) {
                    Some(x) => inputs.push(x),
                    None => return,
                }
            }
            if let Some(d) = self.evaluate(&inputs) {
                *v = d;
            }
        });
        Ok(Band::new(out))
    }
}
