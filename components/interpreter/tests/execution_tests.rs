//! End-to-end execution tests: literal IR in, observed stdout out.

use builtins::HostContext;
use core_types::{ErrorKind, Value, VmError};
use interpreter::VirtualMachine;

fn run(source: &str) -> (Result<(), VmError>, Vec<String>) {
    run_with_input(source, "")
}

fn run_with_input(source: &str, input: &str) -> (Result<(), VmError>, Vec<String>) {
    let (host, output) = HostContext::with_io(input);
    let mut vm = VirtualMachine::with_host(host);
    vm.load_source(source).unwrap();
    let result = vm.execute();
    let lines = output.borrow().clone();
    (result, lines)
}

fn vm_for(source: &str) -> VirtualMachine {
    let (host, _) = HostContext::with_io("");
    let mut vm = VirtualMachine::with_host(host);
    vm.load_source(source).unwrap();
    vm
}

#[test]
fn arithmetic_and_print() {
    let (result, output) = run("LOAD 2\nLOAD 3\nBINARY_OP +\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["5"]);
}

#[test]
fn string_concatenation() {
    let (result, output) = run("LOAD \"foo\"\nLOAD \"bar\"\nBINARY_OP +\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["foobar"]);
}

#[test]
fn conditional_branch_takes_else() {
    let source = "\
LOAD 0
IF
LOAD \"A\"
PRINT
ELSE
LOAD \"B\"
PRINT
END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["B"]);
}

#[test]
fn conditional_branch_takes_then() {
    let source = "\
LOAD 1
IF
LOAD \"A\"
PRINT
ELSE
LOAD \"B\"
PRINT
END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["A"]);
}

#[test]
fn if_without_else_skips_body() {
    let (result, output) = run("LOAD 0\nIF\nLOAD \"skipped\"\nPRINT\nEND\nLOAD \"after\"\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["after"]);
}

#[test]
fn loop_counts_to_three() {
    let source = "\
DEFVAR i
LOAD 0
STORE i
LOAD i
LOAD 3
BINARY_OP <
WHILE
DO
LOAD i
PRINT
LOAD i
LOAD 1
BINARY_OP +
STORE i
LOAD i
LOAD 3
BINARY_OP <
END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["0", "1", "2"]);
}

#[test]
fn loop_with_false_condition_never_runs() {
    let (result, output) = run("LOAD 0\nWHILE\nDO\nLOAD 1\nPRINT\nEND\nLOAD 9\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["9"]);
}

#[test]
fn nested_loops() {
    let source = "\
DEFVAR i
LOAD 0
STORE i
LOAD i
LOAD 2
BINARY_OP <
WHILE
DO
DEFVAR j
LOAD 0
STORE j
LOAD j
LOAD 2
BINARY_OP <
WHILE
DO
LOAD i
LOAD 10
BINARY_OP *
LOAD j
BINARY_OP +
PRINT
LOAD j
LOAD 1
BINARY_OP +
STORE j
LOAD j
LOAD 2
BINARY_OP <
END
LOAD i
LOAD 1
BINARY_OP +
STORE i
LOAD i
LOAD 2
BINARY_OP <
END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["0", "1", "10", "11"]);
}

#[test]
fn nested_conditionals_pair_correctly() {
    let source = "\
LOAD 1
IF
LOAD 1
IF
LOAD \"inner\"
PRINT
ELSE
LOAD \"inner-else\"
PRINT
END
ELSE
LOAD \"outer-else\"
PRINT
END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["inner"]);
}

#[test]
fn division_by_zero_is_reported() {
    let (result, output) = run("LOAD 10\nLOAD 0\nBINARY_OP /\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("Division by zero"));
    assert_eq!(err.line, Some(3));
    assert!(output.is_empty());
}

#[test]
fn gc_reclaims_popped_allocation() {
    let mut vm = vm_for("LOAD 8\nPTR_new\nPOP\nGC_gc\n");
    vm.execute().unwrap();
    assert_eq!(vm.host().gc.reclaimed_total(), 1);
    assert_eq!(vm.host().gc.live_count(), 0);
    // GC_gc pushes the reclaimed count.
    assert_eq!(vm.state().stack.last(), Some(&Value::Int(1)));
}

#[test]
fn gc_new_and_delete_balance() {
    let mut vm = vm_for("LOAD 4\nGC_new\nGC_delete\n");
    vm.execute().unwrap();
    assert_eq!(vm.host().gc.live_count(), 0);
    assert_eq!(vm.host().gc.reclaimed_total(), 0);
}

#[test]
fn mem_malloc_and_free_balance() {
    let mut vm = vm_for("LOAD 16\nMEM_malloc\nMEM_free\n");
    vm.execute().unwrap();
    assert_eq!(vm.host().raw.block_count(), 0);
    assert!(vm.state().stack.is_empty());
}

#[test]
fn ptr_deref_renders_object() {
    let (result, output) = run("LOAD 8\nPTR_new\nPTR_DEREF\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["[ptr_data:object]"]);
}

#[test]
fn null_pointer_deref_is_runtime_error() {
    // A failed open yields a null pointer.
    let (result, _) = run("LOAD \"/no/such/file.txt\"\nCALL open\nPTR_DEREF\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("null pointer"));
}

#[test]
fn undefined_variable_loads_zero() {
    let (result, output) = run("LOAD nothing\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["0"]);
}

#[test]
fn store_without_defvar_goes_global() {
    let mut vm = vm_for("LOAD 7\nSTORE x\n");
    vm.execute().unwrap();
    assert_eq!(vm.state().globals.get("x"), Some(&Value::Int(7)));
    assert!(vm.state().scopes[0].is_empty());
}

#[test]
fn defvar_strips_type_annotation() {
    let mut vm = vm_for("DEFVAR count:int\nLOAD 3\nSTORE count\nLOAD count\nPRINT\n");
    vm.execute().unwrap();
    assert!(vm.state().scopes[0].contains_key("count"));
}

#[test]
fn function_call_and_return() {
    let source = "\
GOTO main
FUNC setup
DEFVAR local
LOAD 42
STORE local
LOAD local
PRINT
RETURN
LABEL main
CALL setup
LOAD local
PRINT
";
    let (result, output) = run(source);
    result.unwrap();
    // The callee's binding is scope-local and gone after RETURN.
    assert_eq!(output, ["42", "0"]);
}

#[test]
fn function_writes_to_global() {
    let source = "\
GOTO main
FUNC bump
LOAD 5
STORE shared
RETURN
LABEL main
CALL bump
LOAD shared
PRINT
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["5"]);
}

#[test]
fn undefined_function_is_runtime_error() {
    let (result, _) = run("CALL missing\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("Undefined function: missing"));
}

#[test]
fn undefined_label_is_runtime_error() {
    let (result, _) = run("GOTO nowhere\nPASS\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("Undefined label: nowhere"));
}

#[test]
fn goto_skips_between_labels() {
    let (result, output) = run("GOTO end\nLOAD \"skipped\"\nPRINT\nLABEL end\nLOAD \"ok\"\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["ok"]);
}

#[test]
fn stack_underflow_is_access_error() {
    for source in ["BINARY_OP +\n", "UNARY_OP -\n", "POP\n", "PRINT\n", "STORE x\n"] {
        let (result, _) = run(source);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Access, "wrong kind for {:?}", source);
        assert!(err.message.contains("underflow"), "message for {:?}", source);
        assert_eq!(err.line, Some(1));
    }
}

#[test]
fn binary_op_stack_effect() {
    let mut vm = vm_for("LOAD 1\nLOAD 2\nBINARY_OP +\n");
    vm.execute().unwrap();
    assert_eq!(vm.state().stack, vec![Value::Int(3)]);
}

#[test]
fn unary_minus_and_not() {
    let (result, output) = run("LOAD 5\nUNARY_OP -\nPRINT\nLOAD 0\nUNARY_OP not\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["-5", "true"]);
}

#[test]
fn push_and_pop_immediates() {
    let (result, output) = run("PUSH 1.5\nPRINT\nPUSH word\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["1.5", "word"]);
}

#[test]
fn input_feeds_the_stack() {
    let (result, output) = run_with_input("INPUT\nPRINT\nINPUT\nPRINT\n", "hello\nworld\n");
    result.unwrap();
    assert_eq!(output, ["hello", "world"]);
}

#[test]
fn input_builtin_matches_opcode() {
    let (result, output) = run_with_input("CALL input\nPRINT\n", "line one\n");
    result.unwrap();
    assert_eq!(output, ["line one"]);
}

#[test]
fn throw_carries_message_and_line() {
    let (result, _) = run("PASS\nLOAD \"boom\"\nTHROW\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert_eq!(err.message, "boom");
    assert_eq!(err.line, Some(3));
}

#[test]
fn throw_builtin_matches_opcode() {
    let (result, _) = run("LOAD \"bang\"\nCALL throw\n");
    let err = result.unwrap_err();
    assert_eq!(err.message, "bang");
}

#[test]
fn try_catch_are_recognized_noops() {
    let (result, output) = run("TRY\nLOAD 1\nPRINT\nCATCH\nPASS\nLOAD 2\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["1", "2"]);
}

#[test]
fn import_logs_module_name() {
    let (result, output) = run("IMPORT math\nPASS\n");
    result.unwrap();
    assert_eq!(output, ["Importing module: math"]);
}

#[test]
fn unknown_mnemonics_execute_as_nop() {
    let (result, output) = run("WOBBLE 1 2 3\nLOAD \"ok\"\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["ok"]);
}

#[test]
fn bool_builtin_agrees_with_branching() {
    let source = "\
LOAD 0
CALL bool
IF
LOAD \"t\"
PRINT
ELSE
LOAD \"f\"
PRINT
END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["f"]);
}

#[test]
fn builtin_call_through_registry() {
    let (result, output) = run("LOAD -3\nCALL abs\nPRINT\nLOAD \"steve\"\nCALL len\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["3", "5"]);
}

#[test]
fn failed_open_prints_null_pointer() {
    let (result, output) = run("LOAD \"/no/such/file.txt\"\nCALL open\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["null_ptr"]);
}

#[test]
fn missing_end_resolves_to_program_end() {
    // IF with no END: the false branch jumps to the end of the program.
    let (result, output) = run("LOAD 0\nIF\nLOAD \"unreached\"\nPRINT\n");
    result.unwrap();
    assert!(output.is_empty());
}

#[test]
fn comments_and_delimiters_are_ignored() {
    let source = "\
# IR BEGIN
; program header
LOAD 2   ; lhs
LOAD 3   ; rhs
BINARY_OP +
PRINT
IR END
";
    let (result, output) = run(source);
    result.unwrap();
    assert_eq!(output, ["5"]);
}

#[test]
fn long_arithmetic_promotes() {
    let (result, output) = run("LOAD 4294967296\nLOAD 2\nBINARY_OP *\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["8589934592"]);
}

#[test]
fn float_division_prints_clean_integers() {
    let (result, output) = run("LOAD 7.0\nLOAD 2.0\nBINARY_OP /\nPRINT\nLOAD 6.0\nLOAD 2.0\nBINARY_OP /\nPRINT\n");
    result.unwrap();
    assert_eq!(output, ["3.5", "3"]);
}
