//! Execution of one command line
//!
//! Every command loads the store, applies at most one operation, saves the
//! section it touched and prints it again. Problems are reported in the
//! `Record` rather than returned: once reported, a failure is only a
//! `Reported` marker that stops the command.

use clap::ArgMatches;
use std::{path::PathBuf, str::FromStr, thread, time::Duration};

use crate::cli::{
    args::{date_arg, purpose_arg},
    config::Config,
    plot::Plotter,
    render::{self, View},
};
use crate::lib::{
    date,
    entry::{Amount, EntryKind},
    error::Error,
    goal::{Goal, Horizon, Plan},
    habit::{Outcome, INDEPENDENT},
    skill::Level,
    state::{AppState, Section},
};
use crate::load::{
    self,
    backup::{self, BackupError},
    error::Record,
    pin::{self, PinError},
    FileStore, StoreError,
};

/// A failure that was already written to the `Record`
#[derive(Debug)]
pub struct Reported;

type Done = Result<(), Reported>;

/// Translation of an error into a report
trait Report {
    fn report(&self, errs: &mut Record);
}

impl Report for Error {
    fn report(&self, errs: &mut Record) {
        errs.make(self.label()).text(self).hint(self.fix_hint());
    }
}

impl Report for StoreError {
    fn report(&self, errs: &mut Record) {
        let hint = match self {
            StoreError::Corrupt { .. } => "restore a backup, or move the file away to start over",
            _ => "the data file was left as it was",
        };
        errs.make("Storage failure").text(self).hint(hint);
    }
}

impl Report for BackupError {
    fn report(&self, errs: &mut Record) {
        let label = match self {
            BackupError::Io { .. } => "Cannot access backup",
            _ => "Invalid backup file",
        };
        errs.make(label).text(self).hint("nothing was restored");
    }
}

impl Report for PinError {
    fn report(&self, errs: &mut Record) {
        match self {
            PinError::Store(e) => e.report(errs),
            PinError::NotSet => {
                errs.make("No PIN").nonfatal().text(self);
            }
            _ => {
                errs.make("PIN refused").text(self).hint("the previous PIN is unchanged");
            }
        }
    }
}

fn fail<E>(e: E, errs: &mut Record) -> Reported
where
    E: Report,
{
    e.report(errs);
    Reported
}

/// Parse a typed value, reporting it as invalid input otherwise
fn parse<T>(m: &ArgMatches, arg: &str, field: &'static str, errs: &mut Record) -> Result<T, Reported>
where
    T: FromStr,
{
    let raw = m.value_of(arg).unwrap_or_default();
    raw.trim()
        .parse()
        .map_err(|_| fail(Error::invalid(field, format!("'{}' is not a whole number", raw)), errs))
}

/// 0-based index from a 1-based number of the list
fn index(m: &ArgMatches, errs: &mut Record) -> Result<usize, Reported> {
    let n: usize = parse(m, "N", "number", errs)?;
    n.checked_sub(1)
        .ok_or_else(|| fail(Error::invalid("number", "lists are numbered from 1"), errs))
}

fn amount(m: &ArgMatches, errs: &mut Record) -> Result<Amount, Reported> {
    let raw = m.value_of("AMOUNT").unwrap_or_default();
    Amount::parse(raw)
        .ok_or_else(|| fail(Error::invalid("amount", format!("'{}' is not a number", raw)), errs))
}

/// Stop here if a PIN protects the store and was not given correctly
fn unlock(store: &FileStore, config: &Config, errs: &mut Record) -> Done {
    if !pin::is_set(store) {
        return Ok(());
    }
    match config.pin.as_deref() {
        None => {
            errs.make("Locked")
                .text("the data is protected by a PIN")
                .hint("pass it with --pin or LIFEPLAN_PIN");
            Err(Reported)
        }
        Some(given) => match pin::check(store, given) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!("wrong PIN");
                errs.make("Wrong PIN").text("the PIN does not match");
                Err(Reported)
            }
            Err(e) => Err(fail(e, errs)),
        },
    }
}

/// Loaded data for the duration of one command
pub struct Session<'c> {
    config: &'c Config,
    store: FileStore,
    state: AppState,
}

impl<'c> Session<'c> {
    pub fn open(config: &'c Config, errs: &mut Record) -> Result<Self, Reported> {
        let store = FileStore::open(&config.data).map_err(|e| fail(e, errs))?;
        unlock(&store, config, errs)?;
        let state = load::load_state(&store, errs);
        Ok(Self {
            config,
            store,
            state,
        })
    }

    fn view(&self) -> View<'c> {
        View {
            currency: &self.config.currency,
            today: date::today(),
            now: date::now(),
        }
    }

    fn show(&self, section: Section) {
        println!("{}", render::render(&self.state, section, &self.view()));
    }

    /// Persist then redraw a section that was changed
    fn commit(&mut self, section: Section, errs: &mut Record) -> Done {
        load::save(&mut self.store, &self.state, section).map_err(|e| fail(e, errs))?;
        self.show(section);
        Ok(())
    }

    fn plan(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        match m.subcommand() {
            ("set", Some(m)) => {
                let mut plan = Plan::default();
                for horizon in Horizon::all() {
                    let key = horizon.key();
                    let day = match m.value_of(date_arg(key)) {
                        None => None,
                        Some(raw) if raw.trim().is_empty() => None,
                        Some(raw) => Some(date::parse_day(raw).ok_or_else(|| {
                            fail(
                                Error::invalid("date", format!("'{}' is not a YYYY-MM-DD date", raw)),
                                errs,
                            )
                        })?),
                    };
                    *plan.get_mut(horizon) = Goal::new(
                        m.value_of(key).unwrap_or_default(),
                        day,
                        m.value_of(purpose_arg(key)).unwrap_or_default(),
                    );
                }
                let section = self.state.save_plan(plan);
                self.commit(section, errs)
            }
            _ => {
                self.show(Section::Goals);
                Ok(())
            }
        }
    }

    fn expense(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        let section = match m.subcommand() {
            ("add", Some(m)) => {
                let value = amount(m, errs)?;
                self.state
                    .add_expense(m.value_of("NAME").unwrap_or_default(), value)
            }
            ("rm", Some(m)) => {
                let i = index(m, errs)?;
                self.state.remove_expense(i)
            }
            _ => {
                self.show(Section::Expenses);
                return Ok(());
            }
        };
        let section = section.map_err(|e| fail(e, errs))?;
        self.commit(section, errs)
    }

    fn entry(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        let section = match m.subcommand() {
            ("add", Some(m)) => {
                let value = amount(m, errs)?;
                let raw = m.value_of("TYPE").unwrap_or_default();
                let kind = EntryKind::from_name(raw).ok_or_else(|| {
                    fail(
                        Error::invalid("type", format!("'{}' is not a kind of entry", raw)),
                        errs,
                    )
                })?;
                self.state.add_entry(
                    m.value_of("NAME").unwrap_or_default(),
                    value,
                    kind,
                    m.value_of("category").unwrap_or_default(),
                )
            }
            ("rm", Some(m)) => {
                let i = index(m, errs)?;
                self.state.remove_entry(i)
            }
            _ => {
                self.show(Section::Entries);
                return Ok(());
            }
        };
        let section = section.map_err(|e| fail(e, errs))?;
        self.commit(section, errs)
    }

    fn skill(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        let section = match m.subcommand() {
            ("add", Some(m)) => {
                let level = m
                    .value_of("level")
                    .and_then(Level::from_name)
                    .unwrap_or_default();
                self.state.add_skill(
                    m.value_of("NAME").unwrap_or_default(),
                    m.value_of("category").unwrap_or_default(),
                    level,
                )
            }
            ("bump", Some(m)) => {
                let i = index(m, errs)?;
                let delta: i32 = parse(m, "DELTA", "delta", errs)?;
                self.state.bump_skill(i, delta).map(|(section, progress)| {
                    tracing::debug!(progress, "skill bumped");
                    section
                })
            }
            ("note", Some(m)) => {
                let i = index(m, errs)?;
                let stamp = date::now().format(NOTE_STAMP).to_string();
                self.state
                    .note_skill(i, m.value_of("TEXT").unwrap_or_default(), stamp)
            }
            ("rm", Some(m)) => {
                let i = index(m, errs)?;
                self.state.remove_skill(i)
            }
            _ => {
                self.show(Section::Skills);
                return Ok(());
            }
        };
        let section = section.map_err(|e| fail(e, errs))?;
        self.commit(section, errs)
    }

    fn habit(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        let (section, outcome) = match m.subcommand() {
            ("start", Some(m)) => {
                let goal = m.value_of("goal").unwrap_or(INDEPENDENT);
                let name = m.value_of("NAME").unwrap_or_default();
                (self.state.start_habit(name, goal), None)
            }
            ("mark", Some(m)) => {
                let i = index(m, errs)?;
                let today = date::today();
                let again = self.state.habits.get(i).map_or(false, |h| h.checked_on(today));
                if again && !m.is_present("force") {
                    errs.make("Already checked in")
                        .text(format!("'{}' was already checked in today", self.state.habits[i].name))
                        .hint("pass --force to check in again");
                    return Err(Reported);
                }
                match self.state.mark_habit(i, !m.is_present("missed"), today) {
                    Ok((section, outcome)) => (Ok(section), Some((i, outcome))),
                    Err(e) => (Err(e), None),
                }
            }
            ("bulk", Some(m)) => {
                let i = index(m, errs)?;
                let days: u32 = parse(m, "DAYS", "days", errs)?;
                match self.state.add_habit_days(i, days) {
                    Ok((section, outcome)) => (Ok(section), Some((i, outcome))),
                    Err(e) => (Err(e), None),
                }
            }
            ("archive", Some(m)) => {
                let i = index(m, errs)?;
                (self.state.archive_habit(i), None)
            }
            _ => {
                self.show(Section::Habits);
                return Ok(());
            }
        };
        let section = section.map_err(|e| fail(e, errs))?;
        self.commit(section, errs)?;
        if let Some((i, outcome)) = outcome {
            if let Some(line) = celebrate(&self.state.habits[i].name, outcome) {
                println!("{}", line);
            }
        }
        Ok(())
    }

    fn deadline(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        let section = match m.subcommand() {
            ("add", Some(m)) => {
                let raw = m.value_of("WHEN").unwrap_or_default();
                let when = date::parse_moment(raw).ok_or_else(|| {
                    fail(
                        Error::invalid("date", format!("'{}' is not a YYYY-MM-DDTHH:MM time", raw)),
                        errs,
                    )
                })?;
                self.state
                    .add_deadline(m.value_of("NAME").unwrap_or_default(), when)
            }
            ("rm", Some(m)) => {
                let i = index(m, errs)?;
                self.state.remove_deadline(i)
            }
            ("next", _) => {
                println!("{}", render::next_deadline(&self.state, date::now()));
                return Ok(());
            }
            ("watch", Some(m)) => {
                let ticks = match m.value_of("ticks") {
                    None => None,
                    Some(_) => Some(parse::<u64>(m, "ticks", "ticks", errs)?),
                };
                self.watch(ticks);
                return Ok(());
            }
            _ => {
                self.show(Section::Deadlines);
                return Ok(());
            }
        };
        let section = section.map_err(|e| fail(e, errs))?;
        self.commit(section, errs)
    }

    /// Redraw countdowns once per second, the plan once per minute
    fn watch(&self, ticks: Option<u64>) {
        let mut tick = 0;
        while ticks.map_or(true, |t| tick < t) {
            let now = date::now();
            if tick % PLAN_REFRESH == 0 {
                self.show(Section::Goals);
            }
            println!("Next: {}", render::next_deadline(&self.state, now));
            tick += 1;
            thread::sleep(Duration::from_secs(1));
        }
    }

    fn backup(&mut self, m: &ArgMatches, errs: &mut Record) -> Done {
        match m.subcommand() {
            ("import", Some(m)) => {
                let path = m.value_of("FILE").unwrap_or_default();
                let applied =
                    backup::import_from(&mut self.state, path, errs).map_err(|e| fail(e, errs))?;
                load::save_all(&mut self.store, &self.state, &applied)
                    .map_err(|e| fail(e, errs))?;
                let names = applied.iter().map(Section::to_string).collect::<Vec<_>>();
                println!("Restored from '{}': {}", path, names.join(", "));
                Ok(())
            }
            (_, m) => {
                let path = m
                    .and_then(|m| m.value_of("FILE"))
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(backup::file_name(date::today())));
                backup::export_to(&self.state, &path).map_err(|e| fail(e, errs))?;
                println!("Backup written to '{}'", path.display());
                Ok(())
            }
        }
    }

    fn plot(&self, m: &ArgMatches, errs: &mut Record) -> Done {
        let file = m.value_of("FILE").unwrap_or("lifeplan.svg");
        if let Err(e) = Plotter::from(&self.state).save(file) {
            errs.make("Cannot write chart")
                .text(e)
                .hint(format!("check that '{}' can be written", file));
            return Err(Reported);
        }
        println!("Chart written to '{}'", file);
        Ok(())
    }
}

/// Message for a check-in that moved the habit to another stage
fn celebrate(name: &str, outcome: Outcome) -> Option<String> {
    match outcome {
        Outcome::Promoted { .. } if outcome.completes_chain() => {
            Some(format!("'{}' completed its whole chain and can be archived", name))
        }
        Outcome::Promoted { from, to } => Some(format!(
            "'{}' finished the {} stage and moves on to the {} stage",
            name, from, to
        )),
        Outcome::Missed => Some(format!("'{}' marked as missed today", name)),
        Outcome::Progressed => None,
    }
}

/// Timestamp of skill notes, as a human would write it
const NOTE_STAMP: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Seconds between two redraws of the plan countdowns
const PLAN_REFRESH: u64 = 60;

/// PIN management, which needs the store but not the state
fn pin_command(config: &Config, m: &ArgMatches, errs: &mut Record) -> Done {
    let mut store = FileStore::open(&config.data).map_err(|e| fail(e, errs))?;
    match m.subcommand() {
        ("set", Some(m)) => {
            unlock(&store, config, errs)?;
            pin::set(
                &mut store,
                m.value_of("PIN").unwrap_or_default(),
                m.value_of("CONFIRM").unwrap_or_default(),
            )
            .map_err(|e| fail(e, errs))?;
            println!("PIN set");
        }
        ("check", Some(m)) => {
            let ok = pin::check(&store, m.value_of("PIN").unwrap_or_default())
                .map_err(|e| fail(e, errs))?;
            if !ok {
                errs.make("Wrong PIN").text("the PIN does not match");
                return Err(Reported);
            }
            println!("PIN accepted");
        }
        _ => {
            if !pin::is_set(&store) {
                return Err(fail(PinError::NotSet, errs));
            }
            unlock(&store, config, errs)?;
            pin::clear(&mut store).map_err(|e| fail(e, errs))?;
            println!("PIN removed");
        }
    }
    Ok(())
}

fn dispatch(config: &Config, matches: &ArgMatches, errs: &mut Record) -> Done {
    let (name, m) = match matches.subcommand() {
        ("pin", Some(m)) => return pin_command(config, m, errs),
        (name, Some(m)) => (name, m),
        _ => return Ok(()),
    };
    let mut session = Session::open(config, errs)?;
    tracing::debug!(command = name, data = %config.data.display(), "running");
    match name {
        "plan" => session.plan(m, errs),
        "expense" => session.expense(m, errs),
        "entry" => session.entry(m, errs),
        "skill" => session.skill(m, errs),
        "habit" => session.habit(m, errs),
        "deadline" => session.deadline(m, errs),
        "wealth" => {
            println!("{}", render::wealth(&session.state, &session.view()));
            Ok(())
        }
        "dashboard" => {
            println!("{}", render::dashboard(&session.state));
            Ok(())
        }
        "backup" => session.backup(m, errs),
        "plot" => session.plot(m, errs),
        _ => unreachable!("subcommand {} is not declared", name),
    }
}

/// Run the command described by `matches`
pub fn run(matches: &ArgMatches, errs: &mut Record) {
    let config = Config::from_matches(matches);
    if dispatch(&config, matches, errs).is_err() {
        tracing::debug!("command failed");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::args;
    use crate::lib::habit::Stage;
    use tempfile::TempDir;

    struct Env {
        dir: TempDir,
    }

    impl Env {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn path(&self, name: &str) -> String {
            self.dir.path().join(name).display().to_string()
        }

        /// Run one command line against the data file of this environment
        fn run(&self, line: &[&str]) -> Record {
            let data = self.path("data.json");
            let mut argv = vec!["lifeplan", "--data", data.as_str()];
            argv.extend_from_slice(line);
            let matches = args::build().get_matches_from_safe(argv).unwrap();
            let mut errs = Record::new();
            run(&matches, &mut errs);
            errs
        }

        fn state(&self) -> AppState {
            let store = FileStore::open(self.path("data.json")).unwrap();
            load::load_state(&store, &mut Record::new())
        }
    }

    macro_rules! ok {
        ( $env:expr, $( $arg:expr ),* ) => {{
            let errs = $env.run(&[ $( $arg ),* ]);
            assert!(!errs.is_fatal(), "{}", errs);
        }};
    }

    macro_rules! refused {
        ( $env:expr, $( $arg:expr ),* ) => {{
            let errs = $env.run(&[ $( $arg ),* ]);
            assert!(errs.is_fatal());
            errs
        }};
    }

    #[test]
    fn money_commands_persist() {
        let env = Env::new();
        ok!(env, "expense", "add", "Rent", "45000");
        ok!(env, "entry", "add", "Salary", "90000", "income", "--category", "job");
        ok!(env, "entry", "add", "Car loan", "-1500", "debt");
        refused!(env, "expense", "add", "Gift", "lots");
        refused!(env, "expense", "rm", "0");
        refused!(env, "entry", "rm", "7");
        let state = env.state();
        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.entries[1].amount, Amount(-1500.0));
        ok!(env, "expense", "rm", "1");
        assert!(env.state().expenses.is_empty());
    }

    #[test]
    fn plan_then_linked_habit() {
        let env = Env::new();
        ok!(env, "plan", "set", "--short", "Run a 10k", "--short-date", "2030-05-01");
        refused!(env, "plan", "set", "--long", "x", "--long-date", "soon");
        assert_eq!(env.state().plan.short.text, "Run a 10k");
        ok!(env, "habit", "start", "Jog", "--goal", "Run a 10k");
        let errs = refused!(env, "habit", "start", "Swim");
        assert_eq!(errs.iter().next().unwrap().label(), "Chain conflict");
        assert_eq!(env.state().links()[0].habits.len(), 1);
    }

    #[test]
    fn second_mark_needs_force() {
        let env = Env::new();
        ok!(env, "habit", "start", "Read");
        ok!(env, "habit", "mark", "1");
        let errs = refused!(env, "habit", "mark", "1");
        assert_eq!(errs.iter().next().unwrap().label(), "Already checked in");
        assert_eq!(env.state().habits[0].progress, 1);
        ok!(env, "habit", "mark", "1", "--force");
        assert_eq!(env.state().habits[0].progress, 2);
    }

    #[test]
    fn bulk_and_archive() {
        let env = Env::new();
        ok!(env, "habit", "start", "Read");
        refused!(env, "habit", "bulk", "1", "0");
        ok!(env, "habit", "bulk", "1", "21");
        assert_eq!(env.state().habits[0].stage, Stage::Days90);
        refused!(env, "habit", "archive", "1");
        ok!(env, "habit", "bulk", "1", "90");
        ok!(env, "habit", "bulk", "1", "180");
        ok!(env, "habit", "bulk", "1", "365");
        assert!(env.state().habits[0].is_completed());
        ok!(env, "habit", "archive", "1");
        assert!(env.state().habits.is_empty());
    }

    #[test]
    fn skills_and_deadlines() {
        let env = Env::new();
        ok!(env, "skill", "add", "Rust", "-c", "technical", "-l", "advanced");
        ok!(env, "skill", "bump", "1", "150");
        ok!(env, "skill", "bump", "1", "-30");
        ok!(env, "skill", "note", "1", "lifetimes");
        let skill = &env.state().skills[0];
        assert_eq!((skill.level, skill.progress), (Level::Advanced, 70));
        assert_eq!(skill.notes[0].text, "lifetimes");
        ok!(env, "deadline", "add", "Visa", "2031-01-01T09:30");
        refused!(env, "deadline", "add", "Tax", "next week");
        ok!(env, "deadline", "watch", "--ticks", "0");
        assert_eq!(env.state().deadlines.len(), 1);
    }

    #[test]
    fn backup_roundtrip_through_files() {
        let env = Env::new();
        ok!(env, "expense", "add", "Rent", "100");
        let file = env.path("backup.json");
        ok!(env, "backup", "export", file.as_str());
        ok!(env, "expense", "rm", "1");
        ok!(env, "backup", "import", file.as_str());
        assert_eq!(env.state().expenses.len(), 1);
        std::fs::write(&file, "not json").unwrap();
        let errs = refused!(env, "backup", "import", file.as_str());
        assert_eq!(errs.iter().next().unwrap().label(), "Invalid backup file");
        assert_eq!(env.state().expenses.len(), 1);
    }

    #[test]
    fn pin_locks_every_command() {
        let env = Env::new();
        refused!(env, "pin", "set", "1234", "4321");
        ok!(env, "pin", "set", "1234", "1234");
        let errs = refused!(env, "wealth");
        assert_eq!(errs.iter().next().unwrap().label(), "Locked");
        refused!(env, "--pin", "0000", "wealth");
        refused!(env, "pin", "check", "0000");
        ok!(env, "pin", "check", "1234");
        ok!(env, "--pin", "1234", "expense", "add", "Food", "10");
        refused!(env, "pin", "clear");
        ok!(env, "--pin", "1234", "pin", "clear");
        ok!(env, "wealth");
        assert_eq!(env.state().expenses.len(), 1);
    }

    #[test]
    fn plot_is_written() {
        let env = Env::new();
        let file = env.path("chart.svg");
        ok!(env, "plot", file.as_str());
        assert!(std::path::Path::new(&file).exists());
    }
}
