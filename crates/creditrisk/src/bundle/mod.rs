//! Model bundle loading and saving.
//!
//! A bundle packs everything fixed at training time into one JSON document:
//! the ordered feature schema, the fitted scaler, optional category levels and
//! the classifier. It is loaded once at startup and never mutated.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "bundle": {
//!     "features": ["SCORE_CR22", "RESIDENTIAL_RENT"],
//!     "cols_to_scale": ["SCORE_CR22"],
//!     "scaler": { "mean": [640.0], "scale": [85.0] },
//!     "model": { "type": "logistic", "coefficients": [-0.8, 0.3], "intercept": -1.2 }
//!   }
//! }
//! ```

mod convert;
pub mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::align::{FeatureAligner, UnknownCategoryPolicy};
use crate::encode::CategoryLevels;
use crate::error::{Result, RiskError};
use crate::model::Model;
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

use schema::{BundleEnvelope, BundleSchema};

/// Current bundle format version.
pub const FORMAT_VERSION: u32 = 1;

/// Descriptive bundle metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleMeta {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A loaded, validated model bundle.
///
/// Immutable after construction; share it behind an [`Arc`] when several
/// predictors or threads need it.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    meta: BundleMeta,
    schema: Arc<FeatureSchema>,
    scaler: StandardScaler,
    levels: CategoryLevels,
    model: Model,
}

impl ModelBundle {
    /// Assemble a bundle from runtime parts.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::SchemaMismatch`] if the model width differs from
    /// the schema width.
    pub fn new(
        schema: Arc<FeatureSchema>,
        scaler: StandardScaler,
        levels: CategoryLevels,
        model: Model,
    ) -> Result<Self> {
        use crate::model::Classifier;

        if model.n_features() != schema.n_features() {
            return Err(RiskError::schema(format!(
                "model expects {} features, schema has {}",
                model.n_features(),
                schema.n_features()
            )));
        }
        Ok(Self {
            meta: BundleMeta::default(),
            schema,
            scaler,
            levels,
            model,
        })
    }

    /// Set descriptive metadata.
    pub fn with_meta(mut self, meta: BundleMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Load a bundle from a JSON file.
    ///
    /// Relative paths are resolved with [`resolve_path`].
    ///
    /// # Errors
    ///
    /// [`RiskError::ArtifactLoad`] if the file cannot be opened or parsed or
    /// has an unsupported version; [`RiskError::SchemaMismatch`] if its
    /// contents are inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = resolve_path(path.as_ref());
        let file = File::open(&path).map_err(|e| RiskError::load(&path, e))?;
        let bundle = Self::read_from(BufReader::new(file), &path)?;

        tracing::info!(
            path = %path.display(),
            name = bundle.meta.name.as_deref().unwrap_or("<unnamed>"),
            model = bundle.model.kind(),
            n_features = bundle.schema.n_features(),
            n_scaled = bundle.scaler.columns().len(),
            "loaded model bundle"
        );
        Ok(bundle)
    }

    /// Read a bundle from any JSON reader.
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        Self::read_from(reader, Path::new("<reader>"))
    }

    /// Parse a bundle from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::read_json(json.as_bytes())
    }

    fn read_from<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let envelope: BundleEnvelope =
            serde_json::from_reader(reader).map_err(|e| RiskError::load(origin, e))?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(RiskError::load(
                origin,
                format!(
                    "unsupported bundle format version {} (expected {FORMAT_VERSION})",
                    envelope.format_version
                ),
            ));
        }

        Self::try_from(envelope.bundle)
    }

    /// Write the bundle as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> std::io::Result<()> {
        let envelope = BundleEnvelope {
            format_version: FORMAT_VERSION,
            bundle: BundleSchema::from(self),
        };
        serde_json::to_writer_pretty(writer, &envelope)?;
        Ok(())
    }

    /// Save the bundle to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()
    }

    /// Bundle metadata.
    pub fn meta(&self) -> &BundleMeta {
        &self.meta
    }

    /// Trained feature schema.
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Fitted scaler.
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Training category levels.
    pub fn levels(&self) -> &CategoryLevels {
        &self.levels
    }

    /// The classifier.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Feature aligner bound to this bundle's schema and scaler.
    pub fn aligner(&self, policy: UnknownCategoryPolicy) -> FeatureAligner {
        FeatureAligner::new(Arc::clone(&self.schema), self.scaler.clone())
            .with_levels(self.levels.clone())
            .with_policy(policy)
    }

    /// Split into aligner and classifier.
    pub fn into_parts(self, policy: UnknownCategoryPolicy) -> (FeatureAligner, Model) {
        let aligner = FeatureAligner::new(self.schema, self.scaler)
            .with_levels(self.levels)
            .with_policy(policy);
        (aligner, self.model)
    }
}

/// Resolve a bundle path.
///
/// Absolute paths are returned unchanged. A relative path is looked up next
/// to the running executable first and falls back to the working directory.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)));

    match beside_exe {
        Some(candidate) if candidate.exists() => candidate,
        _ => path.to_path_buf(),
    }
}
