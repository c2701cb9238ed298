use cmdopts::{
    make_flag, make_operand, make_option, ArgumentParser, Constraint, OptionSpec, ValueSpec,
};

fn main() {
    let mut level: u8 = 1;
    let mut destination = String::default();

    let group = vec![
        make_flag(
            OptionSpec::long("verbose").with_short('v').help("Print each copied file."),
            Constraint::new().at_most(3),
        )
        .unwrap(),
        make_option(
            OptionSpec::long("level").with_short('l').help("The compression level."),
            ValueSpec::new().bind(&mut level).description("N"),
            Constraint::new().at_most(1),
        )
        .unwrap(),
        make_operand(
            "destination",
            ValueSpec::new().bind(&mut destination),
            Constraint::new().occurrences(1).at_position(0),
        )
        .unwrap(),
        make_operand("source", ValueSpec::<String>::new(), Constraint::new().at_least(1)).unwrap(),
    ];

    let map = ArgumentParser::new(&group).parse_env_or_exit();
    let sources: Vec<String> = map.values_of("source").unwrap();
    let verbosity = map.count("verbose");
    drop(group);

    println!("Copying {} file(s) to {destination} (level {level}).", sources.len());

    if verbosity > 0 {
        for source in sources {
            println!("  {source}");
        }
    }
}
