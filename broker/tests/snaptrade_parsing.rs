//! Tests for SnapTrade response parsing and request signing. No live connection needed.

#[cfg(feature = "snaptrade")]
mod snaptrade_tests {
    use orderbridge_broker::snaptrade::auth;
    use orderbridge_broker::snaptrade::types::{
        AccountWire, LoginBody, LoginRedirect, OrderResponse, StatusResponse, UniversalSymbolWire,
    };
    use orderbridge_broker::{Account, ApiStatus, PlacedOrder, SymbolMatch};

    const QUERY: &str =
        "clientId=TESTCLIENT&timestamp=1700000000&userId=user_test&userSecret=secret-123";

    // ========================================================================
    // Signing
    // ========================================================================

    #[test]
    fn sign_known_vectors() {
        assert_eq!(
            auth::sign("YOUR_CONSUMER_KEY", "/api/v1/accounts", QUERY, None),
            "qPmn7NZ4ZKeuxPjyYShpmgKMce63vnwZlqCU02FSbYU="
        );
        let body = serde_json::json!({ "substring": "AAPL" });
        assert_eq!(
            auth::sign(
                "YOUR_CONSUMER_KEY",
                "/api/v1/accounts/acct-1/symbols",
                QUERY,
                Some(&body)
            ),
            "1Ntv7NnqVLmzcxb0d7A52QJw284V6xSjW5QaFNeDaJ0="
        );
    }

    #[test]
    fn sign_key_order_does_not_matter() {
        let a: serde_json::Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"a":2,"b":1}"#).unwrap();
        assert_eq!(
            auth::sign("k", "/p", "q", Some(&a)),
            auth::sign("k", "/p", "q", Some(&b))
        );
    }

    #[test]
    fn sign_different_keys_differ() {
        assert_ne!(
            auth::sign("key1", "/p", "q", None),
            auth::sign("key2", "/p", "q", None)
        );
    }

    #[test]
    fn canonical_json_escapes_strings() {
        let v = serde_json::json!({ "note": "a \"quoted\" value" });
        assert_eq!(auth::canonical_json(&v), r#"{"note":"a \"quoted\" value"}"#);
    }

    // ========================================================================
    // Response parsing
    // ========================================================================

    #[test]
    fn parse_status() {
        let wire: StatusResponse =
            serde_json::from_str(r#"{"version": 151, "timestamp": "2024-01-01T00:00:00Z", "online": true}"#)
                .unwrap();
        let status = ApiStatus::from(wire);
        assert!(status.online);
        assert_eq!(status.version.as_deref(), Some("151"));
    }

    #[test]
    fn parse_accounts() {
        let json = r#"[
            {
                "id": "917c8734-8470-4a3e-a18f-57c3f2ee6631",
                "brokerage_authorization": "87b24961-b51e-4db8-9226-f198f6518a89",
                "name": "Robinhood Individual",
                "number": "Q6542138443",
                "institution_name": "Robinhood",
                "meta": { "type": "Margin" }
            },
            { "id": "a-2" }
        ]"#;
        let wire: Vec<AccountWire> = serde_json::from_str(json).unwrap();
        let accounts: Vec<Account> = wire.into_iter().map(Account::from).collect();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].number.as_deref(), Some("Q6542138443"));
        assert_eq!(accounts[0].institution.as_deref(), Some("Robinhood"));
        assert!(accounts[0].matches("q6542138443"));
        assert_eq!(accounts[1].id, "a-2");
        assert!(accounts[1].name.is_none());
    }

    #[test]
    fn parse_symbol_search() {
        let json = r#"[
            {
                "id": "2bcd7cc3-e922-4976-bce1-9858296801c3",
                "symbol": "VAB.TO",
                "raw_symbol": "VAB",
                "description": "VANGUARD CDN AGGREGATE BOND INDEX ETF",
                "currency": { "code": "CAD" },
                "exchange": { "code": "TSX", "mic_code": "XTSE", "name": "Toronto Stock Exchange" },
                "type": { "code": "et" }
            },
            { "id": "u-2", "symbol": "VAB" }
        ]"#;
        let wire: Vec<UniversalSymbolWire> = serde_json::from_str(json).unwrap();
        let matches: Vec<SymbolMatch> = wire.into_iter().map(SymbolMatch::from).collect();
        assert_eq!(matches[0].ticker, "VAB.TO");
        assert!(matches[0].is_exact("vab"));
        assert!(matches[0].on_exchange("TSX"));
        assert!(matches[1].exchange.is_none());
    }

    #[test]
    fn parse_symbol_exchange_falls_back_to_mic() {
        let json = r#"{"id": "u-1", "symbol": "SHOP", "exchange": {"mic_code": "XNYS"}}"#;
        let wire: UniversalSymbolWire = serde_json::from_str(json).unwrap();
        assert_eq!(SymbolMatch::from(wire).exchange.as_deref(), Some("XNYS"));
    }

    #[test]
    fn parse_order_response() {
        let json = r#"{
            "brokerage_order_id": "66a033fa-da74-4fcf-b527-feefdec9257e",
            "status": "EXECUTED",
            "universal_symbol": { "id": "u-1" },
            "total_quantity": "10"
        }"#;
        let placed = PlacedOrder::from(serde_json::from_str::<OrderResponse>(json).unwrap());
        assert_eq!(placed.order_id, "66a033fa-da74-4fcf-b527-feefdec9257e");
        assert_eq!(placed.status, "EXECUTED");
    }

    #[test]
    fn login_round_trip() {
        let body = LoginBody {
            broker: Some("QUESTRADE".into()),
            custom_redirect: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"broker":"QUESTRADE"}"#
        );

        let redirect: LoginRedirect = serde_json::from_str(
            r#"{"redirectURI": "https://app.snaptrade.com/snapTrade/redeemToken?token=abc", "sessionId": "s-1"}"#,
        )
        .unwrap();
        assert!(redirect.redirect_uri.starts_with("https://app.snaptrade.com/"));
    }
}
