use crate::policy::PolicyType;
use serde::Deserialize;
use std::path::Path;

/// Traffic directions to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categories {
    pub ingress: bool,
    pub egress: bool,
}

impl Categories {
    pub fn all() -> Self {
        Self {
            ingress: true,
            egress: true,
        }
    }

    /// `--ingress-only`/`--egress-only` style selection. Asking for both, or
    /// for neither, selects both directions.
    pub fn from_flags(ingress_only: bool, egress_only: bool) -> Self {
        match (ingress_only, egress_only) {
            (true, false) => Self {
                ingress: true,
                egress: false,
            },
            (false, true) => Self {
                ingress: false,
                egress: true,
            },
            _ => Self::all(),
        }
    }

    pub fn from_directions(directions: &[PolicyType]) -> Self {
        if directions.is_empty() {
            return Self::all();
        }
        Self {
            ingress: directions.contains(&PolicyType::Ingress),
            egress: directions.contains(&PolicyType::Egress),
        }
    }

    pub fn contains(&self, direction: PolicyType) -> bool {
        match direction {
            PolicyType::Ingress => self.ingress,
            PolicyType::Egress => self.egress,
        }
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub categories: Categories,
    /// Value for `skinparam linetype`, e.g. `ortho` or `polyline`.
    pub line_type: Option<String>,
}

impl RenderOptions {
    pub fn with_categories(mut self, categories: Categories) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_line_type(mut self, line_type: impl Into<String>) -> Self {
        self.line_type = Some(line_type.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub render: RenderOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    line_type: Option<String>,
    categories: Option<Vec<String>>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(line_type) = parsed.line_type.filter(|v| !v.trim().is_empty()) {
        config.render.line_type = Some(line_type);
    }
    if let Some(categories) = parsed.categories {
        let mut directions = Vec::new();
        for category in &categories {
            match category.to_ascii_lowercase().as_str() {
                "ingress" => directions.push(PolicyType::Ingress),
                "egress" => directions.push(PolicyType::Egress),
                other => anyhow::bail!("unknown category {:?} in {}", other, path.display()),
            }
        }
        config.render.categories = Categories::from_directions(&directions);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_select_categories() {
        assert_eq!(Categories::from_flags(false, false), Categories::all());
        assert_eq!(Categories::from_flags(true, true), Categories::all());
        let ingress = Categories::from_flags(true, false);
        assert!(ingress.contains(PolicyType::Ingress));
        assert!(!ingress.contains(PolicyType::Egress));
        let egress = Categories::from_flags(false, true);
        assert!(!egress.contains(PolicyType::Ingress));
        assert!(egress.contains(PolicyType::Egress));
    }

    #[test]
    fn missing_config_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.render.line_type.is_none());
    }

    #[test]
    fn config_file_sets_render_options() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"lineType": "ortho", "categories": ["Egress"]}}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.render.line_type.as_deref(), Some("ortho"));
        assert!(!config.render.categories.ingress);
        assert!(config.render.categories.egress);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"categories": ["sideways"]}}"#).unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }
}
