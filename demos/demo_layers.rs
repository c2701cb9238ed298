use cmdopts::{
    make_options_error, make_operand, make_switch, ArgumentParser, Constraint, OptionSpec,
    ValueSpec,
};

fn main() {
    let group = vec![
        make_switch(
            OptionSpec::long("color"),
            ValueSpec::new().implicit(true),
            Constraint::new(),
        )
        .unwrap(),
        make_switch(
            OptionSpec::long("no-color").key("color"),
            ValueSpec::new().implicit(false),
            Constraint::new(),
        )
        .unwrap(),
        make_operand("item", ValueSpec::<String>::new(), Constraint::new()).unwrap(),
        make_options_error(),
    ];

    // Defaults, as if read from a configuration file.
    let defaults = ArgumentParser::new(&group)
        .parse_incremental(["--no-color"])
        .unwrap();
    let map = ArgumentParser::new(&group)
        .seed(defaults)
        .parse_env_or_exit();

    // The most recent layer wins.
    let color = map.value_of::<bool>("color").unwrap_or(false);
    let items: Vec<String> = map.values_of("item").unwrap();
    println!("color: {color}, items: {items:?}");
}
