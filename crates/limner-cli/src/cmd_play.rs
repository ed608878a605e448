use std::io::{BufRead, Write};

use limner_catalog::{CatalogLookup, SqliteCatalog};
use limner_core::date::{date_with_offset, format_date_key, resolve_playable_date, today_utc};
use limner_core::lookup::resolve_profile;
use limner_core::reveal::reveal_fraction;
use limner_core::session::{GameSession, GuessOutcome, SessionPhase};
use limner_core::suggest::SuggestionIndex;
use limner_core::{
    Evaluator, FeedbackDetail, FeedbackStatus, GameConfig, GameError, PuzzleRecord, PuzzleReveal,
    ValidationError,
};
use limner_store::{try_lock_file, LimnerPaths, SessionStore};
use tokio::runtime::Runtime;

/// How many catalog names are loaded as allowed guesses.
const SUGGESTION_POOL: usize = 10_000;

/// Names shown when a guess is not recognised.
const SUGGESTIONS_SHOWN: usize = 5;

/// `limner play`
pub fn execute(
    paths: &LimnerPaths,
    date: Option<&str>,
    days_ago: Option<u32>,
    give_up: bool,
) -> anyhow::Result<()> {
    let config = GameConfig::load(&paths.config_json)?;
    let today = today_utc();
    let date = match (date, days_ago) {
        (Some(raw), _) => resolve_playable_date(Some(raw), today).ok_or_else(|| {
            anyhow::anyhow!("'{raw}' is not a playable date (YYYY-MM-DD, today or earlier)")
        })?,
        (None, Some(n)) => date_with_offset(today, n)
            .ok_or_else(|| anyhow::anyhow!("{n} days ago is out of range"))?,
        (None, None) => format_date_key(today),
    };

    let catalog = SqliteCatalog::open(&paths.catalog_db)?;
    let puzzle = catalog
        .get_puzzle(&date)?
        .ok_or_else(|| GameError::PuzzleNotFound(date.clone()))?;
    let suggestions = SuggestionIndex::new(catalog.artist_names(SUGGESTION_POOL)?);
    let lookup = CatalogLookup::new(catalog);

    paths.ensure_layout()?;
    let _lock = try_lock_file(&paths.play_lock(&date))?;
    let store = SessionStore::new(paths.clone());
    let mut session = match store.load_or_discard(&date) {
        Some(saved) => GameSession::from_state(saved.to_state()),
        None => GameSession::new(date.as_str(), config.max_attempts),
    };
    session.load_puzzle(&date, config.max_attempts);

    let rt = Runtime::new()?;
    let game = Game {
        puzzle: &puzzle,
        config: &config,
        lookup: &lookup,
        suggestions: (!suggestions.is_empty()).then_some(&suggestions),
        store: &store,
        rt: &rt,
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if give_up {
        game.give_up(&mut session, &mut stdout)?;
        return Ok(());
    }
    game.play(&mut session, stdin.lock(), &mut stdout)
}

/// Everything one terminal game needs besides the session itself.
struct Game<'a> {
    puzzle: &'a PuzzleRecord,
    config: &'a GameConfig,
    lookup: &'a CatalogLookup,
    suggestions: Option<&'a SuggestionIndex>,
    store: &'a SessionStore,
    rt: &'a Runtime,
}

impl Game<'_> {
    fn play<R: BufRead, W: Write>(
        &self,
        session: &mut GameSession,
        input: R,
        out: &mut W,
    ) -> anyhow::Result<()> {
        self.print_header(session, out)?;
        if session.state().finished {
            writeln!(out, "Already finished.")?;
            return self.print_reveal(session, out);
        }

        let mut lines = input.lines();
        loop {
            self.print_prompt(session, out)?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                writeln!(out, "Progress saved.")?;
                return Ok(());
            };
            let line = line?;
            let line = line.trim();

            match line {
                "" => continue,
                ":quit" | ":q" => {
                    writeln!(out, "Progress saved.")?;
                    return Ok(());
                }
                ":giveup" => return self.give_up(session, out),
                _ if line.starts_with('?') => {
                    self.print_matches(line.trim_start_matches('?'), out)?;
                    continue;
                }
                _ => {}
            }

            let outcome = self.rt.block_on(session.submit_guess(
                line,
                self.suggestions,
                self.puzzle,
                &self.evaluator(),
            ));
            match outcome {
                Ok(GuessOutcome::Recorded { attempt, phase }) => {
                    self.save(session)?;
                    if attempt.correct {
                        writeln!(out, "Correct! It is {}.", self.puzzle.artist)?;
                    } else {
                        writeln!(out, "Not {}.", attempt.guess)?;
                        print_feedback(&attempt.feedback, out)?;
                    }
                    if let SessionPhase::Finished { .. } = phase {
                        return self.print_reveal(session, out);
                    }
                }
                Ok(GuessOutcome::Discarded) => {}
                Err(ValidationError::NotInSuggestions(guess)) => {
                    writeln!(out, "  '{guess}' is not in the artist list.")?;
                    self.print_matches(&guess, out)?;
                }
                Err(e) => writeln!(out, "  {e}")?,
            }
        }
    }

    fn give_up<W: Write>(&self, session: &mut GameSession, out: &mut W) -> anyhow::Result<()> {
        if session.state().finished {
            writeln!(out, "Already finished.")?;
        } else {
            session.give_up()?;
            self.save(session)?;
            writeln!(out, "Gave up after {} attempts.", session.state().attempts_used)?;
        }
        self.print_reveal(session, out)
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(self.lookup, self.config)
    }

    fn save(&self, session: &GameSession) -> anyhow::Result<()> {
        let saved = self.store.save_state(session.state())?;
        tracing::debug!(puzzle = %saved.puzzle_id, attempts = saved.attempts_history.len(), "session saved");
        Ok(())
    }

    fn print_header<W: Write>(&self, session: &GameSession, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "Puzzle {}", self.puzzle.date)?;
        if let Some(image) = self.puzzle.display_image() {
            writeln!(out, "  image:  {image}")?;
        }
        if let Some(museum) = &self.puzzle.museum {
            writeln!(out, "  museum: {museum}")?;
        }
        for attempt in &session.state().attempts {
            writeln!(out, "  tried {}", attempt.guess)?;
        }
        if let (Some(index), true) = (self.suggestions, session.state().attempts.is_empty()) {
            let picks = index.shuffled(&mut rand::thread_rng(), SUGGESTIONS_SHOWN);
            writeln!(out, "  e.g. {}", picks.join(", "))?;
        }
        writeln!(out, "Type a painter's name, `?text` to search, `:giveup` or `:quit`.")?;
        Ok(())
    }

    fn print_prompt<W: Write>(&self, session: &GameSession, out: &mut W) -> anyhow::Result<()> {
        let zoom = session.zoom(0.0, self.config);
        let shown = reveal_fraction(zoom, self.config) * 100.0;
        write!(
            out,
            "[{} left | zoom {zoom:.2}x, {shown:.0}% revealed] > ",
            session.state().attempts_left()
        )?;
        out.flush()?;
        Ok(())
    }

    fn print_matches<W: Write>(&self, query: &str, out: &mut W) -> anyhow::Result<()> {
        let Some(index) = self.suggestions else {
            return Ok(());
        };
        let hits = index.search(query, SUGGESTIONS_SHOWN);
        if hits.is_empty() {
            writeln!(out, "  no matching artists")?;
        } else {
            writeln!(out, "  maybe: {}", hits.join(", "))?;
        }
        Ok(())
    }

    fn print_reveal<W: Write>(&self, session: &GameSession, out: &mut W) -> anyhow::Result<()> {
        let profile = self.rt.block_on(resolve_profile(
            self.lookup,
            &self.puzzle.artist,
            self.config.lookup_timeout(),
        ));
        let reveal = PuzzleReveal::from_record(self.puzzle, profile);
        let verdict = if session.state().success {
            "solved"
        } else {
            "not solved"
        };
        writeln!(out, "── {verdict} ──")?;
        writeln!(out, "{} by {}", reveal.title, reveal.artist)?;
        if let Some(year) = &reveal.year {
            writeln!(out, "  year:   {year}")?;
        }
        if let Some(p) = &reveal.artist_profile {
            let span = match (p.birth_year, p.death_year) {
                (Some(b), Some(d)) => format!("{b}–{d}"),
                (Some(b), None) => format!("born {b}"),
                (None, Some(d)) => format!("died {d}"),
                (None, None) => String::new(),
            };
            if !span.is_empty() {
                writeln!(out, "  artist: {span}")?;
            }
            if let Some(movement) = &p.movement {
                writeln!(out, "  movement: {movement}")?;
            }
        }
        if let Some(url) = &reveal.wiki_summary_url {
            writeln!(out, "  more:   {url}")?;
        }
        Ok(())
    }
}

fn print_feedback<W: Write>(feedback: &[FeedbackDetail], out: &mut W) -> anyhow::Result<()> {
    for detail in feedback {
        let mark = match detail.status {
            FeedbackStatus::Match => "=",
            FeedbackStatus::Earlier => "<",
            FeedbackStatus::Later => ">",
            FeedbackStatus::Different => "x",
            FeedbackStatus::Info => "i",
            FeedbackStatus::Missing => "?",
        };
        writeln!(out, "  {mark} {:<14} {}", detail.label.as_str(), detail.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use limner_core::ArtistProfile;
    use std::io::Cursor;

    fn fixture(dir: &std::path::Path) -> (LimnerPaths, PuzzleRecord, CatalogLookup, SuggestionIndex) {
        let paths = LimnerPaths::discover(dir);
        paths.ensure_layout().unwrap();
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        for (name, birth, death) in [
            ("Vincent van Gogh", 1853, 1890),
            ("Claude Monet", 1840, 1926),
            ("Paul Gauguin", 1848, 1903),
        ] {
            catalog
                .upsert_artist(&ArtistProfile {
                    name: name.into(),
                    birth_year: Some(birth),
                    death_year: Some(death),
                    ..Default::default()
                })
                .unwrap();
        }
        let puzzle = PuzzleRecord {
            date: "2024-06-15".into(),
            title: "The Starry Night".into(),
            artist: "Vincent van Gogh".into(),
            year: Some("1889".into()),
            museum: Some("MoMA".into()),
            image_url: None,
            cached_image_url: None,
            wiki_summary_url: None,
            wiki_artist_summary_url: None,
        };
        let suggestions = SuggestionIndex::new(catalog.artist_names(100).unwrap());
        (paths, puzzle, CatalogLookup::new(catalog), suggestions)
    }

    fn run(
        paths: &LimnerPaths,
        puzzle: &PuzzleRecord,
        lookup: &CatalogLookup,
        suggestions: &SuggestionIndex,
        session: &mut GameSession,
        input: &str,
    ) -> String {
        let config = GameConfig::default();
        let store = SessionStore::new(paths.clone());
        let rt = Runtime::new().unwrap();
        let game = Game {
            puzzle,
            config: &config,
            lookup,
            suggestions: Some(suggestions),
            store: &store,
            rt: &rt,
        };
        let mut out = Vec::new();
        game.play(session, Cursor::new(input.to_string()), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn wrong_then_unknown_then_correct() {
        let tmp = tempfile::tempdir().unwrap();
        let (paths, puzzle, lookup, suggestions) = fixture(tmp.path());
        let mut session = GameSession::new("2024-06-15", 5);

        let out = run(
            &paths,
            &puzzle,
            &lookup,
            &suggestions,
            &mut session,
            "Claude Monet\nRembrandt\nclaude monet\nVincent van Gogh\n",
        );

        assert!(out.contains("Not Claude Monet."));
        assert!(out.contains("Birth year"));
        assert!(out.contains("'Rembrandt' is not in the artist list."));
        assert!(out.contains("already guessed"));
        assert!(out.contains("Correct! It is Vincent van Gogh."));
        assert!(out.contains("The Starry Night by Vincent van Gogh"));
        assert_eq!(session.state().attempts_used, 2);
        assert!(session.state().success);

        let saved = SessionStore::new(paths).load("2024-06-15").unwrap().unwrap();
        assert!(saved.finished);
        assert_eq!(saved.attempts_history.len(), 2);
    }

    #[test]
    fn quit_keeps_progress_for_resume() {
        let tmp = tempfile::tempdir().unwrap();
        let (paths, puzzle, lookup, suggestions) = fixture(tmp.path());
        let mut session = GameSession::new("2024-06-15", 5);
        run(
            &paths,
            &puzzle,
            &lookup,
            &suggestions,
            &mut session,
            "Paul Gauguin\n:quit\nClaude Monet\n",
        );
        assert_eq!(session.state().attempts_used, 1);

        let saved = SessionStore::new(paths.clone())
            .load("2024-06-15")
            .unwrap()
            .unwrap();
        let mut resumed = GameSession::from_state(saved.to_state());
        let out = run(
            &paths,
            &puzzle,
            &lookup,
            &suggestions,
            &mut resumed,
            "Paul Gauguin\n",
        );
        assert!(out.contains("tried Paul Gauguin"));
        assert!(out.contains("already guessed"));
        assert_eq!(resumed.state().attempts_used, 1);
    }

    #[test]
    fn give_up_reveals_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let (paths, puzzle, lookup, suggestions) = fixture(tmp.path());
        let mut session = GameSession::new("2024-06-15", 5);
        let out = run(
            &paths,
            &puzzle,
            &lookup,
            &suggestions,
            &mut session,
            ":giveup\n",
        );
        assert!(out.contains("Gave up after 0 attempts."));
        assert!(out.contains("not solved"));
        assert!(out.contains("1853–1890"));
        let saved = SessionStore::new(paths).load("2024-06-15").unwrap().unwrap();
        assert!(saved.gave_up);
        assert!(saved.finished);
    }

    #[test]
    fn search_lists_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let (paths, puzzle, lookup, suggestions) = fixture(tmp.path());
        let mut session = GameSession::new("2024-06-15", 5);
        let out = run(
            &paths,
            &puzzle,
            &lookup,
            &suggestions,
            &mut session,
            "?gau\n",
        );
        assert!(out.contains("maybe: Paul Gauguin"));
        assert_eq!(session.state().attempts_used, 0);
    }
}
