use std::fs::File;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use disclosure::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

const FAQ: [(&str, &str, &str); 3] = [
    ("shipping", "How long does shipping take?", "Three to five business days."),
    ("returns", "Can I return an order?", "Within 30 days, unused and in its box."),
    ("warranty", "Is there a warranty?", "Two years on every device we sell."),
];

fn main() -> io::Result<()> {
    // Set up file logging
    let log_file = File::create("accordion.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut page = Page::from_element(ui());
    let root = page.document().root();
    let config = DisclosureConfig::accordion()
        .single_open(true)
        .close_on_outside_click(true);
    let Some(controller) = page.mount_accordions(root, config) else {
        eprintln!("no accordion found");
        return Ok(());
    };

    // Start on the first trigger.
    page.dispatch(Event::Key {
        target: None,
        key: Key::Tab,
        modifiers: Modifiers::new(),
    });

    terminal::enable_raw_mode()?;
    let result = run(&mut page, controller.as_str());
    terminal::disable_raw_mode()?;
    result
}

fn run(page: &mut Page, controller: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    loop {
        page.tick(Instant::now());
        for change in page.take_events() {
            log::info!("{} {:?}", change.name, change.detail);
        }
        draw(&mut stdout, page, controller)?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let key_code: Key = key.code.into();
        match key_code {
            Key::Char('q') | Key::Escape => return Ok(()),
            Key::Char('o') => {
                // Simulate a click on the page background.
                if let Some(target) = page.element("outside") {
                    page.dispatch(Event::Click { target });
                }
            }
            key_code => page.dispatch(Event::Key {
                target: None,
                key: key_code,
                modifiers: key.modifiers.into(),
            }),
        }
    }
}

fn draw(out: &mut impl Write, page: &Page, controller: &str) -> io::Result<()> {
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    write!(out, "FAQ  (Tab/arrows move, Enter/Space toggle, o=click outside, q=quit)\r\n\r\n")?;

    let doc = page.document();
    let Some(ctl) = page.controller(controller) else {
        return Ok(());
    };
    for item in ctl.items() {
        let Some(trigger) = item.toggle else {
            continue;
        };
        let marker = if page.focused() == Some(trigger) { ">" } else { " " };
        let stop = if doc.tab_index(trigger) == Some(0) { "*" } else { " " };
        let label = doc.text(trigger).unwrap_or_default();
        write!(out, "{marker}{stop} [{:<7}] {label}\r\n", item.state().as_str())?;
        if !doc.hidden(item.panel) {
            let body = doc.text(item.panel).unwrap_or_default();
            write!(out, "      {body}\r\n")?;
        }
    }
    out.flush()
}

fn ui() -> Element {
    Element::div()
        .child(
            Element::section()
                .flag("data-accordion-group")
                .children(FAQ.map(|(id, question, answer)| {
                    Element::div()
                        .flag("data-accordion")
                        .child(Element::button().flag("data-accordion-btn").text(question))
                        .child(
                            Element::div()
                                .id(id)
                                .flag("data-accordion-content")
                                .transition(Duration::from_millis(250))
                                .text(answer),
                        )
                })),
        )
        .child(Element::div().id("outside"))
}
