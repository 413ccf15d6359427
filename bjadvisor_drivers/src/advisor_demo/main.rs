use bjadvisor::Session;
use bjadvisor_drivers::{parse_config_from_file, replay_script};
use clap::Parser;

const DEFAULT_CONFIG_PATH: &str = "~/.bjadvisor.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,
}

fn main() {
    let mut args = CommandLineArgs::parse();
    if args.config == DEFAULT_CONFIG_PATH {
        let home_dir = home::home_dir().expect("Cannot find home directory");
        let config_file_path = home_dir.join(".bjadvisor.yml");
        if !config_file_path.exists() {
            panic!("Config file not exists");
        }
        if config_file_path.is_dir() {
            panic!("This should be a path rather than a directory");
        }
        args.config = String::from(config_file_path.to_str().unwrap());
    }
    let args = args;

    let config = parse_config_from_file(&args.config);
    let mut session = Session::new(&config.table.clone().into());
    replay_script(&mut session, &config.script).expect("Script left the table inconsistent");

    let view = session.view();
    println!(
        "{}",
        serde_yaml::to_string(&view).expect("Cannot render the table view")
    );
    println!("Recommended action: {}", view.recommendation);
}
