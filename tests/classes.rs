#[macro_use]
mod common;

lox_ok!(
    field_get_and_set,
    r#"
    class Box {}
    var box = Box();
    box.value = 1;
    print box.value;
    "#,
    ["1"]
);

lox_ok!(
    method_call_binds_this_to_the_instance,
    r#"
    class Greeter {
      greet() {
        print "hi, " + this.name;
      }
    }

    var greeter = Greeter();
    greeter.name = "world";
    greeter.greet();
    "#,
    ["hi, world"]
);

lox_ok!(
    constructor_runs_on_instantiation_and_returns_the_instance,
    r#"
    class Box {
      init(value) {
        this.value = value;
      }
    }

    var box = Box(42);
    print box.value;
    "#,
    ["42"]
);

lox_ok!(
    class_stringifies_to_its_name_and_instance_to_its_class,
    r#"
    class Box {}
    print Box;
    print Box();
    "#,
    ["Box", "<instance of Box>"]
);

lox_ok!(
    bound_methods_can_be_stored_and_called_later,
    r#"
    class Box {
      init(value) {
        this.value = value;
      }
      get() {
        return this.value;
      }
    }

    var box = Box(7);
    var getter = box.get;
    print getter();
    "#,
    ["7"]
);

lox_ok!(
    subclass_inherits_and_can_override_methods,
    r#"
    class Animal {
      speak() {
        print "...";
      }
    }

    class Dog < Animal {
      speak() {
        print "woof";
      }
    }

    Dog().speak();
    "#,
    ["woof"]
);

lox_ok!(
    super_calls_the_parent_implementation,
    r#"
    class Animal {
      speak() {
        print "...";
      }
    }

    class Dog < Animal {
      speak() {
        super.speak();
        print "woof";
      }
    }

    Dog().speak();
    "#,
    ["...", "woof"]
);

lox_ok!(
    subclass_without_its_own_init_uses_the_parents,
    r#"
    class Animal {
      init(name) {
        this.name = name;
      }
    }

    class Dog < Animal {}

    print Dog("Rex").name;
    "#,
    ["Rex"]
);

lox_err!(
    accessing_an_undefined_property_is_a_runtime_error,
    r#"
    class Box {}
    print Box().missing;
    "#,
    code: 1,
    contains: "Undefined property"
);

lox_err!(
    a_class_cannot_inherit_from_itself,
    "class Oops < Oops {}",
    code: 1,
    contains: "cannot inherit from itself"
);

lox_err!(
    a_class_can_only_inherit_from_a_class,
    r#"
    var NotAClass = 1;
    class Oops < NotAClass {}
    "#,
    code: 1,
    contains: "Superclass must be a class"
);
