#[macro_use]
mod common;

lox_ok!(addition, "print 1 + 2;", ["3"]);
lox_ok!(whole_numbers_print_without_decimal, "print 6 / 2;", ["3"]);
lox_ok!(fractional_numbers_keep_decimal, "print 7 / 2;", ["3.5"]);
lox_ok!(
    precedence_follows_math,
    "print 2 + 3 * 4;",
    ["14"]
);
lox_ok!(
    unary_negation,
    "print -(2 + 2);",
    ["-4"]
);
lox_ok!(
    string_concatenation,
    r#"print "foo" + "bar";"#,
    ["foobar"]
);
lox_ok!(
    comparison_operators,
    r#"
    print 1 < 2;
    print 2 <= 2;
    print 3 > 4;
    print 3 >= 3;
    print 1 == 1;
    print 1 != 2;
    "#,
    ["true", "true", "false", "true", "true", "true"]
);
lox_ok!(
    nil_and_false_are_falsy_everything_else_truthy,
    r#"
    print !nil;
    print !false;
    print !0;
    print !"";
    "#,
    ["true", "true", "false", "false"]
);
