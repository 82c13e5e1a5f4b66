use agent_core::{
    validate_plan, BreakpointPlan, BreakpointPlanner, PlanRequest, PlanTarget,
    PlanValidationError, StaticPlanner,
};
use serde_json::json;

#[tokio::test]
async fn static_planner_output_validates_into_a_plan() {
    let planner = StaticPlanner::new(json!({
        "targetType": "dom-event",
        "selector": "#save-btn",
        "eventType": "click",
        "consoleNotes": ["watch for race"]
    }));
    let request = PlanRequest::new("double save", "- call_cdp", "<button id=\"save-btn\">");
    let raw = planner.plan(&request).await.expect("raw plan");
    let plan = validate_plan(&raw).expect("valid");
    assert_eq!(
        plan,
        BreakpointPlan::dom_event("#save-btn")
            .with_event_type("click")
            .with_console_notes(["watch for race"])
    );
}

#[test]
fn validated_plan_serializes_back_to_an_accepted_shape() {
    let plan = validate_plan(&json!({
        "targetType": "function-call",
        "functionName": "app.cart.checkout",
        "explanation": "charges twice",
        "extraField": { "ignored": true }
    }))
    .expect("valid");
    let again = validate_plan(&serde_json::to_value(&plan).expect("json")).expect("valid");
    assert_eq!(plan, again);
}

#[test]
fn locator_of_the_other_variant_does_not_count() {
    let cases = [
        (
            json!({ "targetType": "dom-event", "functionName": "app.save" }),
            "selector",
        ),
        (
            json!({ "targetType": "function-call", "selector": "#save" }),
            "functionName",
        ),
    ];
    for (raw, missing) in cases {
        match validate_plan(&raw) {
            Err(PlanValidationError::MissingTarget { field, .. }) => assert_eq!(field, missing),
            other => panic!("expected missing {missing}, got {other:?}"),
        }
    }
}

#[test]
fn event_type_is_only_defaulted_at_generation_time() {
    let plan = validate_plan(&json!({ "targetType": "dom-event", "selector": "form" }))
        .expect("valid");
    assert!(plan.event_type.is_none());
    assert_eq!(plan.effective_event_type(), "click");
    assert!(matches!(plan.target, PlanTarget::DomEvent { .. }));
}
