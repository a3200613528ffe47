#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{schema::Schema, PathItemType, RefOr};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components are generated");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            other => panic!("{name} should be an object schema, got {other:?}"),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("HealthResponse"));
        assert!(components.schemas.contains_key("CampaignResponse"));

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field), "missing {field}");
        }
    }

    #[test]
    fn test_application_schema_exposes_review_timestamp() {
        let properties = object_properties("ApplicationResponse");
        assert!(properties.iter().any(|p| p == "reviewed_at"));
        assert!(properties.iter().any(|p| p == "status"));
    }

    #[test]
    fn test_every_route_is_documented() {
        let openapi = ApiDoc::openapi();
        let expected = [
            ("/health", PathItemType::Get),
            ("/api/v1/campaigns", PathItemType::Get),
            ("/api/v1/campaigns", PathItemType::Post),
            ("/api/v1/campaigns/{campaign_id}", PathItemType::Get),
            ("/api/v1/campaigns/{campaign_id}", PathItemType::Put),
            ("/api/v1/campaigns/{campaign_id}/apply", PathItemType::Post),
            ("/api/v1/applications", PathItemType::Post),
            ("/api/v1/applications/{application_id}/review", PathItemType::Post),
            ("/api/v1/review/applications", PathItemType::Get),
            ("/api/v1/review/campaigns", PathItemType::Get),
            ("/api/v1/profiles", PathItemType::Post),
            ("/api/v1/profiles/me", PathItemType::Get),
            ("/api/v1/profiles/me", PathItemType::Put),
            ("/api/v1/dashboard", PathItemType::Get),
        ];

        for (path, method) in expected {
            let item = openapi
                .paths
                .paths
                .get(path)
                .unwrap_or_else(|| panic!("{path} is not documented"));
            assert!(
                item.operations.contains_key(&method),
                "{path} lacks {method:?}"
            );
        }
    }

    #[test]
    fn test_conflict_responses_documented_for_submission() {
        let openapi = ApiDoc::openapi();
        let apply = openapi
            .paths
            .paths
            .get("/api/v1/applications")
            .and_then(|item| item.operations.get(&PathItemType::Post))
            .unwrap();
        assert!(apply.responses.responses.contains_key("201"));
        assert!(apply.responses.responses.contains_key("409"));
    }
}
