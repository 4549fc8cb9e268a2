//! Interactive menu
//!
//! Main menu: register, log in, exit. After logging in: list, add, delete,
//! exit. The document is loaded from the store for every main-menu action
//! and after every dictionary-menu choice, so changes made through the HTTP
//! API in the meantime are picked up.

use std::io::{BufRead, Write};

use anyhow::Result;

use sleng_core::{account, entries, DictionaryError, Document, DocumentStore, Entry};

use crate::prompt::Prompter;

/// Login attempts allowed before returning to the main menu
const LOGIN_ATTEMPTS: u32 = 3;

const SEPARATOR: &str = "==========================================";
const ENTRY_SEPARATOR: &str = "------------------------------------------";

/// One interactive run against a document store
pub struct Session<'a, R, W> {
    store: &'a DocumentStore,
    prompt: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(store: &'a DocumentStore, input: R, output: W) -> Self {
        Self {
            store,
            prompt: Prompter::new(input, output),
        }
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.prompt.into_output()
    }

    /// Run the main menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        self.prompt.say("Modern slang dictionary")?;
        self.prompt.say("-----------------------")?;

        loop {
            self.prompt.say("")?;
            self.prompt.say("=== MAIN MENU ===")?;
            self.prompt.say("1. Register")?;
            self.prompt.say("2. Log in")?;
            self.prompt.say("3. Exit")?;

            let Some(choice) = self.prompt.ask("Choose an action: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if self.register()? {
                        self.prompt.say("Registration complete! Now log in.")?;
                    }
                }
                "2" => {
                    if let Some(username) = self.login()? {
                        return self.run_dictionary(&username);
                    }
                }
                "3" => {
                    self.prompt.say("Goodbye!")?;
                    return Ok(());
                }
                _ => self.prompt.say("Invalid choice, try again")?,
            }
        }
    }

    /// Returns whether a user was registered
    fn register(&mut self) -> Result<bool> {
        let mut doc = self.store.load();
        if doc.user.is_registered() {
            self.prompt
                .say("A user is already registered. Use log in instead.")?;
            return Ok(false);
        }

        let Some(username) = self.prompt.ask("Choose a username: ")? else {
            return Ok(false);
        };
        if username.is_empty() {
            self.prompt.say("Username cannot be empty")?;
            return Ok(false);
        }

        let Some(password) = self.prompt.ask("Choose a password: ")? else {
            return Ok(false);
        };

        if let Err(e) = account::register(&mut doc, &username, &password) {
            self.prompt.say(e)?;
            return Ok(false);
        }

        self.persist(&doc)?;
        self.prompt
            .say(format!("User '{}' registered successfully!", username))?;
        Ok(true)
    }

    /// Returns the username on success
    fn login(&mut self) -> Result<Option<String>> {
        let doc = self.store.load();
        if !doc.user.is_registered() {
            self.prompt.say("You need to register first!")?;
            return Ok(None);
        }

        for remaining in (1..=LOGIN_ATTEMPTS).rev() {
            let Some(username) = self.prompt.ask("Username: ")? else {
                return Ok(None);
            };
            let Some(password) = self.prompt.ask("Password: ")? else {
                return Ok(None);
            };

            match account::login(&doc, &username, &password) {
                Ok(username) => {
                    self.prompt.say(format!("Welcome, {}!", username))?;
                    self.prompt
                        .say(format!("Words loaded: {}", doc.entries.len()))?;
                    return Ok(Some(username));
                }
                Err(DictionaryError::InvalidCredentials) if remaining > 1 => {
                    self.prompt.say(format!(
                        "Invalid username or password. Attempts left: {}",
                        remaining - 1
                    ))?;
                }
                Err(DictionaryError::InvalidCredentials) => {
                    self.prompt.say(
                        "Invalid username or password. Start again from the main menu.",
                    )?;
                }
                Err(e) => {
                    self.prompt.say(e)?;
                    return Ok(None);
                }
            }
        }

        Ok(None)
    }

    fn run_dictionary(&mut self, username: &str) -> Result<()> {
        loop {
            self.prompt.say("")?;
            self.prompt.say(format!("What next, {}?", username))?;
            self.prompt.say("1. Show all words")?;
            self.prompt.say("2. Add a new word")?;
            self.prompt.say("3. Delete a word")?;
            self.prompt.say("4. Exit")?;

            let Some(choice) = self.prompt.ask("Your choice: ")? else {
                return Ok(());
            };
            let doc = self.store.load();

            match choice.as_str() {
                "1" => self.show_entries(&doc)?,
                "2" => self.add_entry(doc)?,
                "3" => self.delete_entry(doc)?,
                "4" => {
                    self.prompt.say("Goodbye!")?;
                    return Ok(());
                }
                _ => self.prompt.say("No such option, try again")?,
            }
        }
    }

    fn show_entries(&mut self, doc: &Document) -> Result<()> {
        let list = entries::list(doc);
        if list.is_empty() {
            self.prompt.say("The dictionary is empty")?;
            return Ok(());
        }

        self.prompt.say("")?;
        self.prompt.say(format!("Total words: {}", list.len()))?;
        self.prompt.say(SEPARATOR)?;
        for (i, entry) in list.iter().enumerate() {
            self.print_entry(i + 1, entry)?;
        }
        Ok(())
    }

    fn print_entry(&mut self, position: usize, entry: &Entry) -> Result<()> {
        self.prompt.say(format!("{}. Word: {}", position, entry.word))?;
        self.prompt.say(format!("   Meaning: {}", entry.meaning))?;
        self.prompt.say(format!("   Example: {}", entry.example))?;
        if !entry.origin.is_empty() {
            self.prompt.say(format!("   Origin: {}", entry.origin))?;
        }
        if !entry.synonyms.is_empty() {
            self.prompt
                .say(format!("   Similar words: {}", entry.synonyms.join(", ")))?;
        }
        self.prompt.say(ENTRY_SEPARATOR)?;
        Ok(())
    }

    fn add_entry(&mut self, mut doc: Document) -> Result<()> {
        self.prompt.say("")?;
        self.prompt.say("Adding a new word")?;

        let Some(word) = self.prompt.ask("Which word? ")? else {
            return Ok(());
        };
        // Reject duplicates before asking for the rest
        if entries::find_word(&doc, &word).is_some() {
            self.prompt
                .say(format!("The word '{}' is already in the dictionary", word))?;
            return Ok(());
        }

        let Some(meaning) = self.prompt.ask("What does it mean? ")? else {
            return Ok(());
        };
        let Some(example) = self.prompt.ask("Give a usage example: ")? else {
            return Ok(());
        };
        let Some(origin) = self.prompt.ask("Where does it come from (optional)? ")? else {
            return Ok(());
        };
        let Some(synonyms) = self
            .prompt
            .ask("Similar words (comma-separated, optional)? ")?
        else {
            return Ok(());
        };

        let entry = Entry::new(word, meaning)
            .with_example(example)
            .with_origin(origin)
            .with_synonyms(entries::parse_synonyms(&synonyms));
        let word = entry.word.clone();

        if let Err(e) = entries::add(&mut doc, entry) {
            self.prompt.say(e)?;
            return Ok(());
        }

        self.persist(&doc)?;
        self.prompt
            .say(format!("Great! The word '{}' was added to the dictionary", word))?;
        Ok(())
    }

    fn delete_entry(&mut self, mut doc: Document) -> Result<()> {
        if doc.entries.is_empty() {
            self.prompt.say("The dictionary is empty, nothing to delete")?;
            return Ok(());
        }

        self.show_entries(&doc)?;

        let Some(answer) = self
            .prompt
            .ask("\nWhich word should be deleted (enter its number)? ")?
        else {
            return Ok(());
        };

        let position = match answer.parse::<usize>() {
            Ok(n) if (1..=doc.entries.len()).contains(&n) => n,
            _ => {
                self.prompt.say("No such number")?;
                return Ok(());
            }
        };

        let word = doc.entries[position - 1].word.clone();
        if !self
            .prompt
            .confirm(&format!("Really delete '{}'?", word))?
        {
            self.prompt.say("Deletion cancelled")?;
            return Ok(());
        }

        if let Err(e) = entries::delete_at(&mut doc, position) {
            self.prompt.say(e)?;
            return Ok(());
        }

        self.persist(&doc)?;
        self.prompt.say(format!("The word '{}' was deleted", word))?;
        Ok(())
    }

    /// Save, telling the user when the write did not go through
    fn persist(&mut self, doc: &Document) -> Result<()> {
        if let Err(e) = self.store.try_save(doc) {
            tracing::error!("Failed to save document: {}", e);
            self.prompt
                .say(format!("Warning: changes could not be saved: {}", e))?;
            if let Some(hint) = e.recovery_suggestion() {
                self.prompt.say(hint)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{self, BufReader, Read};
    use tempfile::TempDir;

    /// Input that hands out one line per read and runs `hook` just before
    /// line `hook_at` is read
    struct ScriptedInput<F: FnMut()> {
        lines: VecDeque<String>,
        served: usize,
        hook_at: usize,
        hook: Option<F>,
    }

    impl<F: FnMut()> ScriptedInput<F> {
        fn new(lines: &[&str], hook_at: usize, hook: F) -> Self {
            Self {
                lines: lines.iter().map(|l| format!("{}\n", l)).collect(),
                served: 0,
                hook_at,
                hook: Some(hook),
            }
        }
    }

    impl<F: FnMut()> Read for ScriptedInput<F> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served == self.hook_at {
                if let Some(mut hook) = self.hook.take() {
                    hook();
                }
            }
            let Some(line) = self.lines.pop_front() else {
                return Ok(0);
            };
            self.served += 1;
            let bytes = line.as_bytes();
            buf[..bytes.len()].copy_from_slice(bytes);
            Ok(bytes.len())
        }
    }

    fn test_store(temp_dir: &TempDir) -> DocumentStore {
        DocumentStore::new(temp_dir.path().join("slang.json"))
    }

    fn seeded_store(temp_dir: &TempDir, words: &[&str]) -> DocumentStore {
        let store = test_store(temp_dir);
        let mut doc = Document::default();
        account::register(&mut doc, "ann", "secr3t").unwrap();
        for word in words {
            entries::add(&mut doc, Entry::new(*word, format!("meaning of {}", word))).unwrap();
        }
        store.try_save(&doc).unwrap();
        store
    }

    fn run(store: &DocumentStore, input: &str) -> String {
        let mut session = Session::new(store, input.as_bytes(), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    fn words(store: &DocumentStore) -> Vec<String> {
        store.load().entries.into_iter().map(|e| e.word).collect()
    }

    #[test]
    fn test_end_of_input_exits() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let output = run(&store, "");
        assert!(output.contains("MAIN MENU"));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_register_login_add_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let input = "1\nann\nsecr3t\n\
                     2\nann\nsecr3t\n\
                     2\nrizz\ncharisma\nhe has rizz\n\ngame, charm\n\
                     1\n4\n";
        let output = run(&store, input);

        assert!(output.contains("User 'ann' registered successfully!"));
        assert!(output.contains("Welcome, ann!"));
        assert!(output.contains("1. Word: rizz"));
        assert!(output.contains("Similar words: game, charm"));
        assert!(!output.contains("Origin:"));

        let doc = store.load();
        assert_eq!(doc.user.username, "ann");
        assert_eq!(
            doc.entries,
            vec![Entry::new("rizz", "charisma")
                .with_example("he has rizz")
                .with_synonyms(vec!["game".to_string(), "charm".to_string()])]
        );
    }

    #[test]
    fn test_register_rejects_short_password() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let output = run(&store, "1\nann\nabc\n3\n");
        assert!(output.contains("at least 4 characters"));
        assert!(!store.load().user.is_registered());
    }

    #[test]
    fn test_register_twice_is_refused() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &[]);

        let output = run(&store, "1\n3\n");
        assert!(output.contains("already registered"));
        assert_eq!(store.load().user.password, "secr3t");
    }

    #[test]
    fn test_login_before_registration() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);

        let output = run(&store, "2\n3\n");
        assert!(output.contains("register first"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_login_gives_up_after_three_attempts() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &[]);

        let output = run(&store, "2\nann\nbad\nann\nbad\nAnn\nsecr3t\n3\n");
        assert!(output.contains("Attempts left: 2"));
        assert!(output.contains("Attempts left: 1"));
        assert!(output.contains("Start again from the main menu"));
        assert!(!output.contains("Welcome"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_login_succeeds_on_last_attempt() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &["rizz"]);

        let output = run(&store, "2\nann\nbad\nann\nbad\nann\nsecr3t\n4\n");
        assert!(output.contains("Welcome, ann!"));
        assert!(output.contains("Words loaded: 1"));
    }

    #[test]
    fn test_add_duplicate_is_rejected_early() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &["rizz"]);

        let output = run(&store, "2\nann\nsecr3t\n2\nRIZZ\n4\n");
        assert!(output.contains("already in the dictionary"));
        assert!(!output.contains("What does it mean?"));
        assert_eq!(words(&store), vec!["rizz"]);
    }

    #[test]
    fn test_add_without_meaning_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &[]);

        let output = run(&store, "2\nann\nsecr3t\n2\ncap\n\n\n\n\n4\n");
        assert!(output.contains("word and meaning are required"));
        assert!(words(&store).is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &["rizz", "cap", "bussin"]);

        let input = "2\nann\nsecr3t\n\
                     3\n2\nn\n\
                     3\n2\nДа\n\
                     4\n";
        let output = run(&store, input);

        assert!(output.contains("Deletion cancelled"));
        assert!(output.contains("The word 'cap' was deleted"));
        assert_eq!(words(&store), vec!["rizz", "bussin"]);
    }

    #[test]
    fn test_delete_rejects_bad_numbers() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &["rizz"]);

        let output = run(&store, "2\nann\nsecr3t\n3\n0\n3\n2\n3\nabc\n4\n");
        assert_eq!(output.matches("No such number").count(), 3);
        assert_eq!(words(&store), vec!["rizz"]);
    }

    #[test]
    fn test_delete_from_empty_dictionary() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &[]);

        let output = run(&store, "2\nann\nsecr3t\n3\n1\n4\n");
        assert!(output.contains("nothing to delete"));
        assert!(output.contains("The dictionary is empty"));
    }

    #[test]
    fn test_unknown_dictionary_option() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &["bussin"]);

        let output = run(&store, "2\nann\nsecr3t\n9\n1\n4\n");
        assert!(output.contains("No such option"));
        assert!(output.contains("Total words: 1"));
        assert!(output.contains("1. Word: bussin"));
        assert!(output.contains("   Meaning: meaning of bussin"));
    }

    #[test]
    fn test_dictionary_menu_sees_changes_made_elsewhere() {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, &["bussin"]);
        let path = store.path().to_path_buf();

        // Another writer adds a word after the first listing
        let input = ScriptedInput::new(&["2", "ann", "secr3t", "1", "1", "4"], 4, move || {
            let other = DocumentStore::new(path.clone());
            let mut doc = other.load();
            entries::add(&mut doc, Entry::new("cap", "a lie")).unwrap();
            other.try_save(&doc).unwrap();
        });

        let mut session = Session::new(&store, BufReader::new(input), Vec::new());
        session.run().unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();

        let first = output.find("Total words: 1").unwrap();
        let second = output.find("Total words: 2").unwrap();
        assert!(first < second);
        assert!(output[second..].contains("2. Word: cap"));
        assert_eq!(words(&store), vec!["bussin", "cap"]);
    }
}
