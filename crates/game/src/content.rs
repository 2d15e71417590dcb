use sim::WorldDef;
use thiserror::Error;

/// World content ships inside the binary; there is nothing to install
/// next to it.
const WORLD_JSON: &str = include_str!("../assets/rooms.json");

#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to parse world content at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_world() -> Result<WorldDef, ContentLoadError> {
    parse_world_json(WORLD_JSON)
}

fn parse_world_json(raw: &str) -> Result<WorldDef, ContentLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, WorldDef>(&mut deserializer) {
        Ok(def) => Ok(def),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            Err(ContentLoadError::Parse { path, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_world_parses_and_validates() {
        let def = load_world().expect("embedded content parses");
        assert_eq!(def.rooms.len(), 8);
        let graph = def.validate().expect("embedded content validates");
        assert!(graph.room("tower").is_some());
    }

    #[test]
    fn parse_error_reports_the_failing_path() {
        let raw = r#"{ "view": { "width": 960, "height": "tall" } }"#;
        let error = parse_world_json(raw).expect_err("bad field type");
        let ContentLoadError::Parse { path, .. } = error;
        assert_eq!(path, "view.height");
    }
}
