use std::{
    env,
    io::{self, BufRead, Write},
    str::FromStr,
};

use anyhow::Context;
use log::{debug, LevelFilter};
use redblack::{IterStyle, RedBlackTree};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const COMMANDS: &str = "insert, delete, search, print, plot, min, max, size, style, traverse, exit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Print,
    Plot,
    Min,
    Max,
    Size,
    Style(String),
    Traverse,
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
enum ParseError {
    Empty,
    UnknownCommand(String),
    Arity,
    InvalidKey(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let cmd = tokens.next().ok_or(ParseError::Empty)?.to_lowercase();
        let args: Vec<&str> = tokens.collect();

        let key = |args: &[&str]| -> Result<i64, ParseError> {
            match args {
                [key] => key
                    .parse()
                    .map_err(|_| ParseError::InvalidKey((*key).to_owned())),
                _ => Err(ParseError::Arity),
            }
        };

        let nullary = |args: &[&str], command: Command| -> Result<Command, ParseError> {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(ParseError::Arity)
            }
        };

        match cmd.as_str() {
            "insert" => key(&args).map(Command::Insert),
            "delete" => key(&args).map(Command::Delete),
            "search" => key(&args).map(Command::Search),
            "print" => nullary(&args, Command::Print),
            "plot" => nullary(&args, Command::Plot),
            "min" => nullary(&args, Command::Min),
            "max" => nullary(&args, Command::Max),
            "size" => nullary(&args, Command::Size),
            "traverse" => nullary(&args, Command::Traverse),
            "exit" => nullary(&args, Command::Exit),
            "style" => match args.as_slice() {
                [name] => Ok(Command::Style((*name).to_owned())),
                _ => Err(ParseError::Arity),
            },
            _ => Err(ParseError::UnknownCommand(cmd)),
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

fn run(tree: &mut RedBlackTree<i64>, command: Command, out: &mut impl Write) -> io::Result<Flow> {
    debug!("running {command:?}");

    match command {
        Command::Insert(key) => tree.insert(key),
        Command::Delete(key) => {
            tree.delete(&key);
        }
        Command::Search(key) => match tree.search(&key).key() {
            Some(key) => writeln!(out, "{key}")?,
            None => writeln!(out, "not found")?,
        },
        Command::Print => write!(out, "{tree}")?,
        Command::Plot => {
            let mut dot = String::new();
            tree.dotgraph("rbt", &mut dot)
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "formatting failed"))?;
            writeln!(out, "{dot}")?;
        }
        Command::Min => match tree.minimum().key() {
            Some(key) => writeln!(out, "{key}")?,
            None => writeln!(out, "empty")?,
        },
        Command::Max => match tree.maximum().key() {
            Some(key) => writeln!(out, "{key}")?,
            None => writeln!(out, "empty")?,
        },
        Command::Size => writeln!(out, "{}", tree.len())?,
        Command::Style(name) => {
            if let Err(e) = tree.set_iteration_style(&name) {
                writeln!(out, "Error: {e}.")?;
            }
        }
        Command::Traverse => {
            let keys: Vec<String> = tree
                .iter()
                .filter_map(|node| node.key().map(i64::to_string))
                .collect();
            writeln!(out, "{}", keys.join(" "))?;
        }
        Command::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

fn repl_loop(input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut tree = RedBlackTree::new().with_iteration_style(IterStyle::Inorder);
    let mut lines = input.lines();

    loop {
        write!(out, ">> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(ParseError::UnknownCommand(cmd)) => {
                writeln!(out, "Error: unknown command: {cmd}.")?;
                continue;
            }
            Err(ParseError::Arity) => {
                writeln!(out, "Error: invalid number of arguments.")?;
                continue;
            }
            Err(ParseError::InvalidKey(key)) => {
                writeln!(out, "Error: invalid key: {key}.")?;
                continue;
            }
        };

        if let Flow::Exit = run(&mut tree, command, out)? {
            return Ok(());
        }
    }
}

fn init_logging() -> anyhow::Result<()> {
    let level = match env::var("RBT_LOG") {
        Ok(level) => level
            .parse::<LevelFilter>()
            .with_context(|| format!("invalid RBT_LOG level `{level}`"))?,
        Err(_) => LevelFilter::Warn,
    };

    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to install logger")
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Welcome to RB-Tree REPL.\nCommands available: {COMMANDS}.\n")?;
    repl_loop(io::stdin().lock(), &mut out)?;

    Ok(())
}
