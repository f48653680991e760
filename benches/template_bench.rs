//! Quick benchmark to verify template substitution performance

use paramflow::{
    substitute_parameters, validate_template, ExecutionContext, NodeResult, WorkflowConnection,
    WorkflowNode,
};
use serde_json::{json, Value};
use std::time::Instant;

fn main() {
    // Setup context with some data
    let mut ctx = ExecutionContext::new();
    ctx.record_result("probe", NodeResult::success_str("status: ok\ncode=2\nuptime 3 days"));
    ctx.record_result("scan", NodeResult::success(json!({"open": [22, 80], "host": "web-1"})));
    ctx.set_variable("target", "10.0.0.5");

    let node = WorkflowNode::new("check", "condition");
    let conns = vec![
        WorkflowConnection::new("scan", "probe"),
        WorkflowConnection::new("probe", "check"),
    ];

    // Parameter sets of varying complexity
    let cases: Vec<(&str, Value)> = vec![
        ("no templates", json!({"cmd": "Simple text with no templates"})),
        ("one variable", json!({"cmd": "ping {{variables.target}}"})),
        (
            "extraction",
            json!({"a": "{{input.status}}", "b": "{{input.code}}", "c": "{{input.line3}}"}),
        ),
        (
            "nested",
            json!({
                "argv": ["{{node_scan.output}}", "{{previous_output}}", 3],
                "env": {"T": "{{variables.target}}", "L": "{{input.lines}}"},
            }),
        ),
    ];

    println!("Template Substitution Performance Test");
    println!("======================================\n");

    for (name, params) in &cases {
        let Value::Object(params) = params else {
            continue;
        };

        let iterations = 100_000;
        let start = Instant::now();

        for _ in 0..iterations {
            let _ = substitute_parameters(params, &ctx, &node, &conns);
        }

        let elapsed = start.elapsed();
        let per_op = elapsed / iterations;

        println!("Case: {}", name);
        println!("  Time for {} iterations: {:?}", iterations, elapsed);
        println!("  Per operation: {:?}\n", per_op);
    }

    println!("Template Validation");
    println!("===================\n");

    let template = "{{previous_output}} {{node_scan.output}} {{variables.target}} {{input.line2}}";
    let iterations = 1_000_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = validate_template(template);
    }
    let elapsed = start.elapsed();
    println!("  {} validations: {:?}", iterations, elapsed);
    println!("  Per operation: {:?}", elapsed / iterations);
}
