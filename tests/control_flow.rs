#[macro_use]
mod common;

lox_ok!(
    if_else_branches,
    r#"
    if (true) print "yes"; else print "no";
    if (false) print "yes"; else print "no";
    "#,
    ["yes", "no"]
);

lox_ok!(
    while_loop_counts_up,
    r#"
    var i = 0;
    while (i < 3) {
      print i;
      i = i + 1;
    }
    "#,
    ["0", "1", "2"]
);

lox_ok!(
    for_loop_desugars_to_while,
    r#"
    for (var i = 0; i < 3; i = i + 1) {
      print i;
    }
    "#,
    ["0", "1", "2"]
);

lox_ok!(
    for_loop_with_omitted_initializer,
    r#"
    var i = 0;
    for (; i < 3; i = i + 1) {
      print i;
    }
    "#,
    ["0", "1", "2"]
);

lox_ok!(
    and_returns_the_last_operand_not_a_coerced_bool,
    r#"
    print 1 and 2;
    print false and 2;
    "#,
    ["2", "false"]
);

lox_ok!(
    or_returns_the_first_truthy_operand,
    r#"
    print nil or "default";
    print 1 or 2;
    "#,
    ["default", "1"]
);

lox_ok!(
    or_short_circuits_and_never_evaluates_the_right_operand,
    r#"
    fun boom() {
      print "should not run";
      return true;
    }
    print true or boom();
    "#,
    ["true"]
);
