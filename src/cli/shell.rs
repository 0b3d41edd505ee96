use std::io::{BufRead, Write};

use anyhow::Result;

use crate::application::{render_account_listing, render_statement, LedgerService};
use crate::domain::{format_cents, parse_cents, Cents};

const MENU: &str = "
================ MENU ================
[d]  Deposit
[s]  Withdraw
[e]  Statement
[nc] New account
[lc] List accounts
[nu] New customer
[q]  Quit
======================================
Choose an operation";

/// A selection from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Deposit,
    Withdraw,
    Statement,
    NewAccount,
    ListAccounts,
    NewCustomer,
    Quit,
}

impl MenuCommand {
    /// Parse a menu code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "d" => Some(MenuCommand::Deposit),
            "s" => Some(MenuCommand::Withdraw),
            "e" => Some(MenuCommand::Statement),
            "nc" => Some(MenuCommand::NewAccount),
            "lc" => Some(MenuCommand::ListAccounts),
            "nu" => Some(MenuCommand::NewCustomer),
            "q" => Some(MenuCommand::Quit),
            _ => None,
        }
    }
}

/// What the loop does after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

enum AmountAnswer {
    Amount(Cents),
    Invalid,
    EndOfInput,
}

/// Interactive menu loop over any line-based input and output.
///
/// Running out of input behaves like `q`.
pub struct Shell<R, W> {
    service: LedgerService,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(service: LedgerService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub fn into_parts(self) -> (LedgerService, W) {
        (self.service, self.output)
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(selection) = self.prompt("=> ")? else {
                break;
            };
            let Some(command) = MenuCommand::from_code(&selection) else {
                continue;
            };
            if self.dispatch(command)? == Flow::Quit {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, command: MenuCommand) -> Result<Flow> {
        match command {
            MenuCommand::Quit => Ok(Flow::Quit),
            MenuCommand::NewCustomer => self.new_customer(),
            MenuCommand::NewAccount => self.new_account(),
            MenuCommand::Deposit | MenuCommand::Withdraw | MenuCommand::Statement => {
                self.account_command(command)
            }
            MenuCommand::ListAccounts => {
                let rows = self.service.list_accounts();
                write!(self.output, "\n{}", render_account_listing(&rows))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn new_customer(&mut self) -> Result<Flow> {
        let Some(national_id) = self.prompt("National id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(name) = self.prompt("Name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(address) = self.prompt("Address: ")? else {
            return Ok(Flow::Quit);
        };
        let limit = match self.prompt_amount("Initial limit: ")? {
            AmountAnswer::Amount(cents) => cents,
            AmountAnswer::Invalid => return Ok(Flow::Continue),
            AmountAnswer::EndOfInput => return Ok(Flow::Quit),
        };

        match self
            .service
            .create_customer(&national_id, &name, &address, limit)
        {
            Ok(account) => writeln!(
                self.output,
                "\n=== Customer {} registered! Account: {} ===",
                name,
                account.number()
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn new_account(&mut self) -> Result<Flow> {
        let Some(national_id) = self.prompt("Customer national id: ")? else {
            return Ok(Flow::Quit);
        };
        let limit = match self.prompt_amount("Limit for the new account: ")? {
            AmountAnswer::Amount(cents) => cents,
            AmountAnswer::Invalid => return Ok(Flow::Continue),
            AmountAnswer::EndOfInput => return Ok(Flow::Quit),
        };

        match self.service.add_account(&national_id, limit) {
            Ok(account) => {
                let owner = self.service.customer(&national_id)?.full_name.clone();
                writeln!(
                    self.output,
                    "\n=== New account {} added for {}! ===",
                    account.number(),
                    owner
                )?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    /// Deposit, withdraw and statement all start by locating one account.
    fn account_command(&mut self, command: MenuCommand) -> Result<Flow> {
        let Some(national_id) = self.prompt("National id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(account_number) = self.prompt("Account number: ")? else {
            return Ok(Flow::Quit);
        };
        let lookup = self.service.account(&national_id, &account_number).err();
        if let Some(e) = lookup {
            self.report(&e)?;
            return Ok(Flow::Continue);
        }

        let label = match command {
            MenuCommand::Deposit => "Deposit amount: ",
            MenuCommand::Withdraw => "Withdrawal amount: ",
            _ => {
                let statement = self.service.statement(&national_id, &account_number)?;
                write!(self.output, "\n{}", render_statement(&statement))?;
                return Ok(Flow::Continue);
            }
        };
        let amount = match self.prompt_amount(label)? {
            AmountAnswer::Amount(cents) => cents,
            AmountAnswer::Invalid => return Ok(Flow::Continue),
            AmountAnswer::EndOfInput => return Ok(Flow::Quit),
        };

        let result = if command == MenuCommand::Deposit {
            self.service.deposit(&national_id, &account_number, amount)
        } else {
            self.service.withdraw(&national_id, &account_number, amount)
        };
        match result {
            Ok(account) => writeln!(
                self.output,
                "\n=== Done. Balance: R$ {} | Available: R$ {} ===",
                format_cents(account.balance()),
                format_cents(account.available())
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self, error: &dyn std::error::Error) -> Result<()> {
        writeln!(self.output, "\n****** Error: {} ******", error)?;
        Ok(())
    }

    /// Read one line after showing `label`. `None` means the input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Shell::prompt`], but parses the answer as money. A malformed
    /// amount is reported here.
    fn prompt_amount(&mut self, label: &str) -> Result<AmountAnswer> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(AmountAnswer::EndOfInput);
        };
        match parse_cents(&raw) {
            Ok(cents) => Ok(AmountAnswer::Amount(cents)),
            Err(e) => {
                writeln!(self.output, "\n****** Error: {} '{}' ******", e, raw)?;
                Ok(AmountAnswer::Invalid)
            }
        }
    }
}
