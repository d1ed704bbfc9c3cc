//! Literal cycle diagnostics for three reference modules.
//!
//! The message text, box-drawing characters and spacing are part of the
//! compiler's output contract, so these compare whole strings.

use rime_core::{
    BeanDeclaration, ErrorCode, ModuleDeclaration, ModuleName, ResolveError, resolve_module,
};

const PREFIX: &str = "io.winterframework.test.cycle";

fn module(suffix: &str) -> ModuleName {
    ModuleName::new(format!("{PREFIX}.{suffix}"))
}

fn diagnostics_of(decl: &ModuleDeclaration) -> Vec<(String, String)> {
    match resolve_module(decl) {
        Ok(_) => panic!("module {} should not resolve", decl.name),
        Err(err) => {
            assert_eq!(err.code(), ErrorCode::CycleDetected);
            assert!(matches!(err, ResolveError::Cycles(_)));
            err.diagnostics()
                .iter()
                .map(|d| (d.anchor.to_string(), d.message.clone()))
                .collect()
        }
    }
}

fn expected_diagnostic(anchor: &str, module: &ModuleName, diagram: &[&str]) -> (String, String) {
    let anchor = format!("{module}:{anchor}");
    let message = format!(
        "Bean {anchor} forms a cycle in module {module}\n{}",
        diagram.join("\n")
    );
    (anchor, message)
}

/// beanA -> beanB -> beanC -> beanA
fn module_a() -> ModuleDeclaration {
    let m = module("moduleA");
    ModuleDeclaration::new(m.clone(), 1)
        .with_bean(BeanDeclaration::singleton(m.qualify("beanA")).depends_on(m.qualify("beanB"), "beanB"))
        .with_bean(BeanDeclaration::singleton(m.qualify("beanB")).depends_on(m.qualify("beanC"), "beanC"))
        .with_bean(BeanDeclaration::singleton(m.qualify("beanC")).depends_on(m.qualify("beanA"), "beanA"))
}

/// beanC needs a runnable exposed by beanA through one member.
fn module_b() -> ModuleDeclaration {
    let m = module("moduleB");
    ModuleDeclaration::new(m.clone(), 1)
        .with_bean(BeanDeclaration::singleton(m.qualify("beanA")).depends_on(m.qualify("beanB"), "beanB"))
        .with_bean(BeanDeclaration::singleton(m.qualify("beanB")).depends_on(m.qualify("beanC"), "beanC"))
        .with_bean(BeanDeclaration::singleton(m.qualify("beanC")).depends_on_nested(
            m.qualify("beanA"),
            "runnable",
            ["someRunnable"],
        ))
}

/// beanB needs a runnable two members deep inside beanA.
fn module_c() -> ModuleDeclaration {
    let m = module("moduleC");
    ModuleDeclaration::new(m.clone(), 1)
        .with_bean(BeanDeclaration::singleton(m.qualify("beanA")).depends_on(m.qualify("beanB"), "beanB"))
        .with_bean(BeanDeclaration::singleton(m.qualify("beanB")).depends_on_nested(
            m.qualify("beanA"),
            "runnable",
            ["someNested", "someRunnable"],
        ))
}

#[rustfmt::skip]
const MODULE_A_DIAGRAM: &[&str] = &[
    "  ┌─────────────────────────┐",
    "  │                         │",
    "  │    io.winterframework.test.cycle.moduleA:beanA",
    "  │                         │",
    "  │                         │ io.winterframework.test.cycle.moduleA:beanA:beanB",
    "  │                         │",
    "  │                         ▼",
    "  │    io.winterframework.test.cycle.moduleA:beanB",
    "  ▲                         │",
    "  │                         │ io.winterframework.test.cycle.moduleA:beanB:beanC",
    "  │                         │",
    "  │                         ▼",
    "  │    io.winterframework.test.cycle.moduleA:beanC",
    "  │                         │",
    "  │                         │ io.winterframework.test.cycle.moduleA:beanC:beanA",
    "  │                         │",
    "  └─────────────────────────┘ ",
];

#[rustfmt::skip]
const MODULE_B_DIAGRAM: &[&str] = &[
    "  ┌────────────────────────────────┐",
    "  │                                │",
    "  │           io.winterframework.test.cycle.moduleB:beanA",
    "  │                                │",
    "  │                                │ io.winterframework.test.cycle.moduleB:beanA:beanB",
    "  │                                │",
    "  │                                ▼",
    "  │           io.winterframework.test.cycle.moduleB:beanB",
    "  │                                │",
    "  │                                │ io.winterframework.test.cycle.moduleB:beanB:beanC",
    "  │                                │",
    "  ▲                                ▼",
    "  │           io.winterframework.test.cycle.moduleB:beanC",
    "  │                                │",
    "  │                                │ io.winterframework.test.cycle.moduleB:beanC:runnable",
    "  │                                │",
    "  │                                ▼",
    "  │    io.winterframework.test.cycle.moduleB:beanA.someRunnable",
    "  │                                │",
    "  │                                │ (nested)",
    "  │                                │",
    "  └────────────────────────────────┘ ",
];

#[rustfmt::skip]
const MODULE_C_DIAGRAM: &[&str] = &[
    "  ┌─────────────────────────────────────┐",
    "  │                                     │",
    "  │                io.winterframework.test.cycle.moduleC:beanA",
    "  │                                     │",
    "  │                                     │ io.winterframework.test.cycle.moduleC:beanA:beanB",
    "  │                                     │",
    "  │                                     ▼",
    "  │                io.winterframework.test.cycle.moduleC:beanB",
    "  │                                     │",
    "  │                                     │ io.winterframework.test.cycle.moduleC:beanB:runnable",
    "  │                                     │",
    "  ▲                                     ▼",
    "  │    io.winterframework.test.cycle.moduleC:beanA.someNested.someRunnable",
    "  │                                     │",
    "  │                                     │ (nested)",
    "  │                                     │",
    "  │                                     ▼",
    "  │          io.winterframework.test.cycle.moduleC:beanA.someNested",
    "  │                                     │",
    "  │                                     │ (nested)",
    "  │                                     │",
    "  └─────────────────────────────────────┘ ",
];

#[test]
fn direct_cycle_reports_every_bean() {
    let m = module("moduleA");
    let actual = diagnostics_of(&module_a());

    let expected: Vec<_> = ["beanA", "beanB", "beanC"]
        .into_iter()
        .map(|anchor| expected_diagnostic(anchor, &m, MODULE_A_DIAGRAM))
        .collect();
    assert_eq!(actual.len(), 3);
    assert_eq!(actual, expected);
}

#[test]
fn nested_cycle_reports_first_hop() {
    let m = module("moduleB");
    let actual = diagnostics_of(&module_b());

    let expected: Vec<_> = ["beanA", "beanB", "beanC", "beanA.someRunnable"]
        .into_iter()
        .map(|anchor| expected_diagnostic(anchor, &m, MODULE_B_DIAGRAM))
        .collect();
    assert_eq!(actual.len(), 4);
    assert_eq!(actual, expected);
}

#[test]
fn multi_level_nested_cycle_skips_deeper_hops() {
    let m = module("moduleC");
    let actual = diagnostics_of(&module_c());

    let expected: Vec<_> = ["beanA", "beanB", "beanA.someNested"]
        .into_iter()
        .map(|anchor| expected_diagnostic(anchor, &m, MODULE_C_DIAGRAM))
        .collect();
    assert_eq!(actual.len(), 3);
    assert_eq!(actual, expected);
    assert!(
        !actual
            .iter()
            .any(|(anchor, _)| anchor.ends_with("beanA.someNested.someRunnable")),
        "deeper hops have no declaration site"
    );
}

#[test]
fn diagnostics_are_identical_across_runs() {
    for decl in [module_a(), module_b(), module_c()] {
        assert_eq!(diagnostics_of(&decl), diagnostics_of(&decl));
    }
}
