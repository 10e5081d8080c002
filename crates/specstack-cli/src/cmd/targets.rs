use crate::output::{print_json, print_table};
use specstack_core::{
    paths,
    registrar::{Base, TARGETS},
};

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&TARGETS);
    }

    let rows: Vec<Vec<String>> = TARGETS
        .iter()
        .map(|t| {
            let prefix = match t.base {
                Base::Project => "",
                Base::Home => "~/",
            };
            vec![
                t.id.to_string(),
                format!("{prefix}{}/{}", t.dir, paths::COMMAND_FILE_NAME),
            ]
        })
        .collect();
    print_table(&["TARGET", "PATH"], &rows);
    Ok(())
}
