use std::fs;

use ctypefuzz_lib::{
    entropy::{RngEntropy, ScriptedEntropy},
    fuzz,
    generate::generate,
    settings::GenerateOptsBuilder,
};
use tests::assert_cc_accepts;

include! {concat!(env!("OUT_DIR"), "/tests.rs")}

fn build_opts(options: &[&str]) -> GenerateOptsBuilder {
    let mut opts = GenerateOptsBuilder::new();
    for option in options {
        let (key, value) = option.split_once(' ').unwrap_or((*option, ""));
        let value = value.trim();
        opts = match key {
            "depth" => opts.depth(value.parse().unwrap()),
            "param" => opts.param_max(value.parse().unwrap()),
            "fn-bias" => opts.fn_ptr_bias(value.parse().unwrap()),
            "only-int" => opts.only_int(true),
            "no-cv" => opts.no_cv(true),
            _ => panic!("Unknown scenario option `{option}`"),
        };
    }
    opts
}

/// Replays `draws` with the given options and compares the typedef of `T` with `expected`. The
/// scenario file itself has to be accepted by the C compiler.
fn scenario_test(file: &str, options: &[&str], draws: &str, expected: &str) {
    let opts = build_opts(options)
        .build()
        .unwrap_or_else(|err| panic!("Invalid options in `{file}`: {err}"));
    let mut entropy = ScriptedEntropy::parse(draws)
        .unwrap_or_else(|err| panic!("Invalid draws in `{file}`: {err}"));

    let line = fuzz::typedef(&opts, &mut entropy, "T").unwrap();

    pretty_assertions::assert_str_eq!(
        line.as_str(),
        expected,
        "The generated typedef (left) does not match the expected one (right)",
    );
    assert!(
        entropy.is_exhausted(),
        "`{file}` has {} unused draws",
        entropy.remaining()
    );

    let source = fs::read_to_string(file).unwrap();
    assert_cc_accepts(&source);
}

/// Many typedefs in one translation unit, named `T0`, `T1`, ...
fn random_unit(opts: GenerateOptsBuilder, seeds: std::ops::Range<u64>) -> String {
    let opts = opts.build().unwrap();
    let mut source = String::new();
    for seed in seeds {
        let name = format!("T{seed}");
        let line = fuzz::typedef(&opts, &mut RngEntropy::seeded(seed), &name).unwrap();
        source.push_str(&line);
        source.push('\n');
    }
    source
}

#[test]
fn random_typedefs_compile() {
    let configs = [
        GenerateOptsBuilder::new().depth(2),
        GenerateOptsBuilder::new().depth(3).param_max(3),
        GenerateOptsBuilder::new().depth(4).param_max(2).fn_ptr_bias(0.8),
        GenerateOptsBuilder::new().depth(5).param_max(2).fn_ptr_bias(0.5),
        GenerateOptsBuilder::new()
            .depth(5)
            .param_max(1)
            .only_int(true)
            .no_cv(true),
        GenerateOptsBuilder::new().depth(8).fn_ptr_bias(0.0),
    ];

    for opts in configs {
        assert_cc_accepts(&random_unit(opts, 0..40));
    }
}

#[test]
fn wide_function_pointers_compile() {
    let opts = GenerateOptsBuilder::new().depth(2).param_max(32);
    assert_cc_accepts(&random_unit(opts, 0..10));
}

#[test]
fn same_seed_same_output() {
    let opts = GenerateOptsBuilder::new()
        .depth(6)
        .param_max(4)
        .fn_ptr_bias(0.7);
    pretty_assertions::assert_eq!(
        random_unit(opts.clone(), 100..120),
        random_unit(opts, 100..120)
    );
}

#[test]
fn depth_budget_holds() {
    for depth in 1..=8 {
        let opts = GenerateOptsBuilder::new()
            .depth(depth)
            .param_max(3)
            .fn_ptr_bias(0.6)
            .build()
            .unwrap();
        for seed in 0..50 {
            let ty = generate(&opts, &mut RngEntropy::seeded(seed));
            assert!(ty.depth() <= depth as usize, "{ty} is deeper than {depth}");
        }
    }
}
