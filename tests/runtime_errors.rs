#[macro_use]
mod common;

lox_err!(
    adding_a_number_and_a_string_is_a_runtime_error,
    r#"print 1 + "1";"#,
    code: 1,
    contains: "Operand must be number or strings"
);

lox_err!(
    subtracting_non_numbers_is_a_runtime_error,
    r#"print "a" - "b";"#,
    code: 1,
    contains: "Operand must be a number"
);

lox_err!(
    calling_a_non_callable_value_is_a_runtime_error,
    "var notAFunction = 1; notAFunction();",
    code: 1,
    contains: "Can only call functions and classes"
);

lox_err!(
    calling_with_the_wrong_number_of_arguments_is_a_runtime_error,
    r#"
    fun add(a, b) { return a + b; }
    add(1);
    "#,
    code: 1,
    contains: "Expected 2 arguments but got 1"
);

lox_err!(
    looking_up_an_undefined_global_is_a_runtime_error,
    "print missing;",
    code: 1,
    contains: "Undefined variable"
);
