use routeflow_core::{
    batch_window, flatten_route, BridgeStatus, CompletedStatus, PreparedTransaction, Route,
    RouteError, RouteKind, RouteStep, TxAction,
};

fn tx(chain_id: u64, action: TxAction) -> PreparedTransaction {
    PreparedTransaction {
        chain_id,
        to: "0x000000000000000000000000000000000000dead".to_string(),
        data: "0xdeadbeef".to_string(),
        value: "0x0".to_string(),
        action,
    }
}

fn route(kind: RouteKind, steps: Vec<Vec<PreparedTransaction>>) -> Route {
    Route {
        kind,
        steps: steps
            .into_iter()
            .map(|transactions| RouteStep { transactions })
            .collect(),
        onramp: None,
    }
}

#[test]
fn flatten_assigns_linear_indices_and_step_positions() {
    let r = route(
        RouteKind::Buy,
        vec![
            vec![tx(1, TxAction::Approval), tx(1, TxAction::Other)],
            vec![],
            vec![tx(10, TxAction::Other)],
        ],
    );
    let flat = flatten_route(&r);
    assert_eq!(flat.len(), 3);
    assert_eq!(
        flat.iter().map(|f| f.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(
        flat.iter().map(|f| f.step_index).collect::<Vec<_>>(),
        vec![0, 0, 2]
    );
    assert_eq!(flat[2].tx.chain_id, 10);
}

#[test]
fn flatten_preserves_in_step_order() {
    let mut a = tx(1, TxAction::Approval);
    a.to = "0x01".to_string();
    let mut b = tx(1, TxAction::Other);
    b.to = "0x02".to_string();
    let r = route(RouteKind::Transfer, vec![vec![a, b]]);
    let flat = flatten_route(&r);
    assert_eq!(flat[0].tx.to, "0x01");
    assert_eq!(flat[1].tx.to, "0x02");
}

#[test]
fn batch_window_collects_maximal_same_chain_run() {
    let r = route(
        RouteKind::Buy,
        vec![vec![
            tx(1, TxAction::Approval),
            tx(1, TxAction::Other),
            tx(2, TxAction::Other),
        ]],
    );
    let flat = flatten_route(&r);
    assert_eq!(batch_window(&flat, 0, true), 2);
    assert_eq!(batch_window(&flat, 2, true), 3);
}

#[test]
fn batch_window_is_single_without_capability_or_at_tail() {
    let r = route(
        RouteKind::Buy,
        vec![vec![tx(1, TxAction::Other), tx(1, TxAction::Other)]],
    );
    let flat = flatten_route(&r);
    assert_eq!(batch_window(&flat, 0, false), 1);
    assert_eq!(batch_window(&flat, 1, true), 2);
}

#[test]
fn route_json_round_trips_kind_and_action_tags() {
    let raw = r#"{
        "type": "transfer",
        "steps": [
            {"transactions": [
                {"chainId": 8453, "to": "0xabc", "data": "0x01", "value": "0x0", "action": "approval"},
                {"chainId": 8453, "to": "0xabc", "data": "0x02", "value": "0x0", "action": "transfer"}
            ]}
        ]
    }"#;
    let r = Route::from_json_str(raw).expect("valid route");
    assert_eq!(r.kind, RouteKind::Transfer);
    assert_eq!(r.transaction_count(), 2);
    assert_eq!(r.steps[0].transactions[0].action, TxAction::Approval);
    // Unknown vendor action strings degrade to Other.
    assert_eq!(r.steps[0].transactions[1].action, TxAction::Other);
}

#[test]
fn onramp_route_without_leg_fails_validation() {
    let raw = r#"{"type": "onramp", "steps": []}"#;
    let err = Route::from_json_str(raw).unwrap_err();
    match err {
        RouteError::Validation(v) => {
            assert!(v.violations.iter().any(|v| v.path == "onramp"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn non_hex_calldata_fails_validation() {
    let mut r = route(RouteKind::Buy, vec![vec![tx(1, TxAction::Other)]]);
    r.steps[0].transactions[0].data = "beef".to_string();
    let err = r.validate().unwrap_err();
    match err {
        RouteError::Validation(v) => {
            assert_eq!(v.violations.len(), 1);
            assert!(v.violations[0].path.contains("data"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn bridge_status_wire_format_is_screaming_snake() {
    let s: BridgeStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
    assert_eq!(s, BridgeStatus::Completed);
    assert!(s.is_terminal());
    assert!(!BridgeStatus::Pending.is_terminal());
    assert_eq!(BridgeStatus::NotFound.as_str(), "NOT_FOUND");
}

#[test]
fn completed_status_tags_by_route_kind() {
    let s = CompletedStatus::for_transaction(
        RouteKind::Sell,
        1,
        "0xhash".to_string(),
        serde_json::json!({"amount": "1"}),
    );
    assert_eq!(s.kind_str(), "sell");
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["type"], "sell");
    assert_eq!(json["transactionHash"], "0xhash");
}
