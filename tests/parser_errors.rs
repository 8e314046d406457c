#[macro_use]
mod common;

lox_err!(
    missing_semicolon_is_a_parse_error,
    "var a = 1",
    code: 1,
    contains: "Expect ';'"
);

lox_err!(
    return_outside_a_function_is_a_resolve_error,
    "return 1;",
    code: 1,
    contains: "Cannot return from top-level code"
);

lox_err!(
    this_outside_a_class_is_a_resolve_error,
    "print this;",
    code: 1,
    contains: "Cannot use 'this' outside of a class"
);

lox_err!(
    super_outside_a_class_is_a_resolve_error,
    "print super.method();",
    code: 1,
    contains: "Cannot use 'super' outside of a class"
);

lox_err!(
    super_in_a_class_with_no_superclass_is_a_resolve_error,
    r#"
    class Box {
      method() {
        super.method();
      }
    }
    "#,
    code: 1,
    contains: "Cannot use 'super' in a class with no superclass"
);

lox_err!(
    invalid_assignment_target_is_a_parse_error,
    "1 = 2;",
    code: 1,
    contains: "Invalid assignment target"
);

lox_err!(
    parser_reports_every_error_it_finds_in_one_pass,
    r#"
    var a = ;
    var b = ;
    "#,
    code: 1,
    contains: "Error"
);
