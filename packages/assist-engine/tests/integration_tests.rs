/// Integration tests for the assist service client
/// These tests require a running assist server; point NOTIA_ASSIST_URL at its
/// base address (e.g. http://127.0.0.1:3000) to enable them.
mod integration_tests {
    use notia_assist::{AssistConfig, HttpAssistClient, SuggestionClient};

    fn live_config() -> Option<AssistConfig> {
        let base = std::env::var("NOTIA_ASSIST_URL").ok()?;
        let base = base.trim_end_matches('/');

        Some(AssistConfig {
            suggest_url: format!("{}/api/autocomplete", base),
            chat_url: format!("{}/api/chat", base),
            ..AssistConfig::default()
        })
    }

    #[tokio::test]
    async fn test_suggest_round_trip() {
        let Some(config) = live_config() else {
            eprintln!("Skipping test: NOTIA_ASSIST_URL not set");
            return;
        };

        let client = HttpAssistClient::new(config).unwrap();
        let suggestion = client.suggest("The quick brown fox ").await;

        assert!(
            suggestion.is_ok(),
            "Suggestion lookup failed: {:?}",
            suggestion
        );
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let Some(config) = live_config() else {
            eprintln!("Skipping test: NOTIA_ASSIST_URL not set");
            return;
        };

        let client = HttpAssistClient::new(config).unwrap();
        let reply = client.chat("Say hello").await;

        assert!(reply.is_ok(), "Chat exchange failed: {:?}", reply);
        assert!(
            !reply.unwrap().is_empty(),
            "Chat reply should not be empty"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let config = AssistConfig {
            suggest_url: "http://192.0.2.1:9/api/autocomplete".to_string(),
            chat_url: "http://192.0.2.1:9/api/chat".to_string(),
            timeout_secs: 1,
        };

        let client = HttpAssistClient::new(config).unwrap();
        let result = client.suggest("hello").await;

        assert!(matches!(result, Err(notia_assist::AssistError::Http(_))));
    }
}
