#[macro_use]
mod common;

lox_ok!(
    global_variable_declaration_and_use,
    r#"
    var a = 1;
    print a;
    "#,
    ["1"]
);

lox_ok!(
    reassignment,
    r#"
    var a = 1;
    a = 2;
    print a;
    "#,
    ["2"]
);

lox_ok!(
    uninitialized_variable_is_nil,
    "var a; print a;",
    ["nil"]
);

lox_ok!(
    block_scope_shadows_outer,
    r#"
    var a = "outer";
    {
      var a = "inner";
      print a;
    }
    print a;
    "#,
    ["inner", "outer"]
);

lox_ok!(
    assignment_targets_the_nearest_declaration,
    r#"
    var a = "outer";
    {
      var a = "inner";
      a = "reassigned";
      print a;
    }
    print a;
    "#,
    ["reassigned", "outer"]
);

lox_err!(
    reading_own_initializer_is_a_resolve_error,
    "{ var a = a; }",
    code: 1,
    contains: "Cannot read local variable in its own initializer"
);

lox_err!(
    redeclaring_a_local_is_a_resolve_error,
    "{ var a = 1; var a = 2; }",
    code: 1,
    contains: "already defined with name"
);
