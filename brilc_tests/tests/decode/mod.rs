use brilc_err::decode_err::DecodeErrTy;
use brilc_ir::{decode, instr::Instr, program::Program};
use pretty_assertions::assert_eq;
use std::fs;

macro_rules! decode_fail_test {
    ($test_name:ident, $expected:pat) => {
        #[test]
        fn $test_name() {
            let path = format!("{}/fail/{}.json", crate::INPUT_PATH, stringify!($test_name));
            let text = fs::read_to_string(path).unwrap();
            let err = decode::from_str(&text).unwrap_err();
            assert!(matches!(err.ty, $expected), "unexpected error {:?}", err.ty);
        }
    };
}

decode_fail_test!(both_label_and_op, DecodeErrTy::MalformedInstr { index: 0, .. });
decode_fail_test!(neither_label_nor_op, DecodeErrTy::MalformedInstr { index: 0, .. });
decode_fail_test!(br_one_label, DecodeErrTy::MalformedInstr { index: 0, .. });
decode_fail_test!(const_no_value, DecodeErrTy::MalformedInstr { index: 0, .. });
decode_fail_test!(truncated, DecodeErrTy::Json(_));

#[test]
fn malformed_names_function() {
    let text = fs::read_to_string(format!("{}/fail/neither_label_nor_op.json", crate::INPUT_PATH)).unwrap();
    let err = decode::from_str(&text).unwrap_err();
    assert_eq!(err.func, Some(String::from("main")));
}

#[test]
fn fixture_contents() {
    let program: Program = load_program!("multi_func");
    assert_eq!(program.functions.len(), 2);

    let double = program.function("double").unwrap();
    assert_eq!(double.arg_names().collect::<Vec<_>>(), vec!["x"]);
    assert_eq!(double.ty.as_ref().unwrap().to_string(), "int");

    let call = program.functions[0].instrs[1].as_op().unwrap();
    assert_eq!(call.funcs, vec!["double"]);
    assert!(!call.is_pure());
}

#[test]
fn text_form() {
    let program: Program = load_program!("counting_loop");
    let text = program.functions[0].to_string();

    assert!(text.starts_with("@main(n: int) {\n"));
    assert!(text.contains("\n.header:\n  cond: bool = lt i n;\n  br cond .body .exit;\n"));
    assert!(text.ends_with("  ret;\n}"));
}

#[test]
fn labels_and_ops_kept_in_order() {
    let program: Program = load_program!("diamond");
    let labels: Vec<&Instr> = program.functions[0].instrs.iter().filter(|i| i.is_label()).collect();
    assert_eq!(
        labels,
        vec![&Instr::label("left"), &Instr::label("right"), &Instr::label("join")]
    );
}
