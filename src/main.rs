use std::io::{self, Read};

use datelex::{DateClassifier, DatePolicy, TokenValue};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let classifier =
        DateClassifier::with_token(&config.input, config.token).with_policy(config.policy);

    if classifier.isnumber() {
        println!("number: {}", classifier.convert());
    }
    if let Ok(dates) = classifier.convert_date() {
        for date in dates {
            println!("date: {date}");
        }
    }
    for (range, value) in classifier.iter_tokens_forward() {
        match value {
            TokenValue::Dates(dates) => {
                let rendered: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
                println!("{:>3}..{:<3} date   {}", range.start, range.end, rendered.join(", "));
            }
            TokenValue::Number(n) => {
                println!("{:>3}..{:<3} number {n}", range.start, range.end);
            }
            TokenValue::Text(text) => {
                println!("{:>3}..{:<3} text   {text}", range.start, range.end);
            }
        }
    }
}

struct CliConfig {
    input: String,
    token: char,
    policy: DatePolicy,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut token = ' ';
    let mut policy = DatePolicy::MonthFirst;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("datelex {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--day-first" => policy = DatePolicy::DayFirst,
            "--token" | "-t" => {
                let value = args
                    .next()
                    .ok_or_else(|| "error: --token expects a value".to_string())?;
                token = parse_token(&value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--token=") => {
                let value = arg.trim_start_matches("--token=");
                token = parse_token(value)?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, token, policy })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end_matches('\n').to_string())
}

fn parse_token(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(format!("error: --token expects a single character, got '{value}'")),
    }
}

fn help_text() -> String {
    format!(
        "datelex {version}

Incremental number/date classifier CLI.

Usage:
  datelex [OPTIONS] [--] <input...>

Options:
  -t, --token <char>  Token separator character. Default: space.
  --day-first         Read ambiguous numeric dates as day/month/year.
  -h, --help          Show this help message.
  -V, --version       Print version information.

Reads stdin when no input arguments are provided. Prints the whole-buffer
classification first, then one line per token with its char range.

Exit codes:
  0  Success.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
