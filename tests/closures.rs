#[macro_use]
mod common;

lox_ok!(
    counter_closure_keeps_its_own_state,
    r#"
    fun makeCounter() {
      var count = 0;
      fun counter() {
        count = count + 1;
        return count;
      }
      return counter;
    }

    var counter = makeCounter();
    print counter();
    print counter();
    print counter();
    "#,
    ["1", "2", "3"]
);

lox_ok!(
    independent_closures_do_not_share_state,
    r#"
    fun makeCounter() {
      var count = 0;
      fun counter() {
        count = count + 1;
        return count;
      }
      return counter;
    }

    var a = makeCounter();
    var b = makeCounter();
    a();
    a();
    print a();
    print b();
    "#,
    ["3", "1"]
);

lox_ok!(
    closure_captures_variable_not_value_at_definition_time,
    r#"
    var a = "global";
    fun showA() {
      print a;
    }

    showA();
    a = "reassigned";
    showA();
    "#,
    ["global", "reassigned"]
);

lox_ok!(
    nested_closures_each_keep_their_own_scope,
    r#"
    fun outer() {
      var x = "outer";
      fun middle() {
        var y = "middle";
        fun inner() {
          print x;
          print y;
        }
        inner();
      }
      middle();
    }

    outer();
    "#,
    ["outer", "middle"]
);
