//! Command dispatch table.
//!
//! The shell and the one-shot subcommands both resolve user intent to an
//! [`Action`] through [`COMMANDS`]; [`Session::execute`] performs it.
//!
//! [`Session::execute`]: crate::session::Session::execute

/// Something the user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Search,
    Products,
    Cart,
    Add,
    Buy,
    Remove,
    RemoveId,
    Clear,
    Checkout,
    Help,
    Quit,
}

/// One row of the dispatch table.
#[derive(Debug)]
pub struct Command {
    pub name: &'static str,
    pub args: &'static str,
    pub help: &'static str,
    pub action: Action,
}

/// Every shell command, in help order.
pub const COMMANDS: &[Command] = &[
    Command {
        name: "search",
        args: "<query>",
        help: "Search every suffix right away",
        action: Action::Search,
    },
    Command {
        name: "products",
        args: "",
        help: "List featured products",
        action: Action::Products,
    },
    Command {
        name: "cart",
        args: "",
        help: "Show the cart",
        action: Action::Cart,
    },
    Command {
        name: "add",
        args: "<domain>",
        help: "Add an available domain to the cart",
        action: Action::Add,
    },
    Command {
        name: "buy",
        args: "<product-id>",
        help: "Add a featured product to the cart",
        action: Action::Buy,
    },
    Command {
        name: "remove",
        args: "<domain>",
        help: "Remove a domain from the cart",
        action: Action::Remove,
    },
    Command {
        name: "remove-id",
        args: "<id>",
        help: "Remove a cart row by id",
        action: Action::RemoveId,
    },
    Command {
        name: "clear",
        args: "",
        help: "Empty the cart",
        action: Action::Clear,
    },
    Command {
        name: "checkout",
        args: "",
        help: "Start a hosted checkout for the cart",
        action: Action::Checkout,
    },
    Command {
        name: "help",
        args: "",
        help: "Show this list",
        action: Action::Help,
    },
    Command {
        name: "quit",
        args: "",
        help: "Leave the shell",
        action: Action::Quit,
    },
];

/// Find a command by name, ignoring ASCII case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// Blank line.
    Empty,
    /// Free text to search for as the user types.
    Query(&'a str),
    /// `:name args`
    Command(&'static Command, &'a str),
    /// `:name` with no such command.
    Unknown(&'a str),
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Command {}

/// Classify a line of shell input.
#[must_use]
pub fn parse(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Input::Query(line);
    };

    let (name, args) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .unwrap_or((rest.trim_start(), ""));
    match lookup(name) {
        Some(command) => Input::Command(command, args.trim()),
        None => Input::Unknown(name),
    }
}
