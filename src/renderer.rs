use crate::entities::{
    BonusShip, Bullet, BulletColor, Bunker, Entity, Explodable, Invader, InvaderKind, Player,
};
use crate::game::{Drawable, GameState, Snapshot};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph,
        canvas::{Canvas, Context, Points},
    },
};

const LOGO: [&str; 5] = [
    "█ █▄ █ █ █ ▄▀▄ █▀▄ █▀▀ █▀▄ ▄▀▀",
    "█ █ ▀█ ▀▄▀ █▀█ █ █ █▀▀ █▀▄  ▀▄",
    "▀ ▀  ▀  ▀  ▀ ▀ ▀▀  ▀▀▀ ▀ ▀ ▀▀ ",
    "",
    "S P A C E   D E F E N S E",
];

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub snapshot: Snapshot<'a>,
    pub area: Rect,
    pub muted: bool,
    /// Blinking prompts are visible on this frame
    pub blink_on: bool,
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match view.snapshot.state {
            GameState::Title => self.render_title(frame, view),
            GameState::Playing => self.render_game(frame, view),
            GameState::Paused => {
                self.render_game(frame, view);
                self.render_paused(frame, view);
            }
            GameState::GameOver => {
                self.render_game(frame, view);
                self.render_game_over(frame, view);
            }
        }
    }

    fn render_title(&self, frame: &mut Frame, view: &RenderView) {
        let mut text: Vec<Line> = LOGO
            .iter()
            .map(|line| Line::from(*line).green().bold())
            .collect();
        text.push(Line::from(""));
        text.push(Line::from("*SCORE ADVANCE TABLE*").white());
        text.push(Line::from(""));

        let bonus = BonusShip::new(1.0, 0.0, 0.0);
        text.push(points_row(bonus.sprite(), "= ? MYSTERY", Color::Red));
        for kind in [InvaderKind::Squid, InvaderKind::Crab, InvaderKind::Octopus] {
            let invader = Invader::new(0.0, 0.0, kind);
            text.push(points_row(
                invader.sprite(0),
                &format!("= {} POINTS  TYPE {}", kind.points(), kind.category()),
                invader_color(kind),
            ));
        }

        text.push(Line::from(""));
        text.push(if view.blink_on {
            Line::from("PRESS ENTER").yellow().bold()
        } else {
            Line::from("")
        });
        text.push(Line::from(""));
        text.push(
            Line::from("[A/D/Arrows: Move] [Space: Fire] [P/Esc: Pause] [M: Mute] [Q: Quit]")
                .dark_gray(),
        );

        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
        self.render_mute(frame, view);
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let [hud_area, field_area, controls_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(view.area);

        self.render_hud(frame, view, hud_area);

        let snapshot = view.snapshot;
        let height = snapshot.field_height;
        let baseline = height - snapshot.baseline();
        let ground: Vec<(f64, f64)> = snapshot
            .terrain
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, intact)| **intact)
            .map(|(x, _)| (x as f64, baseline))
            .collect();

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::LEFT | Borders::RIGHT)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, snapshot.field_width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                ctx.draw(&Points {
                    coords: &ground,
                    color: Color::Green,
                });
                for drawable in snapshot.drawables() {
                    draw(ctx, height, drawable);
                }
            });
        frame.render_widget(canvas, field_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [P/Esc: Pause] [M: Mute] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView, area: Rect) {
        let snapshot = view.snapshot;
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let ships = (0..snapshot.lives)
            .map(|_| snapshot.player.sprite())
            .collect::<Vec<_>>()
            .join(" ");
        let stats = Line::from(vec![
            Span::styled("SCORE ", label),
            Span::styled(format!("{:05}", snapshot.score), value),
            Span::styled("  WAVE ", label),
            Span::styled(format!("{}", snapshot.wave), value),
            Span::styled("  LIVES ", label),
            Span::styled(format!("{} ", snapshot.lives), value),
            Span::styled(ships, Style::default().fg(Color::Green)),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };
        frame.render_widget(Paragraph::new(stats), stats_area);
        self.render_mute(frame, view);
    }

    fn render_mute(&self, frame: &mut Frame, view: &RenderView) {
        if !view.muted {
            return;
        }
        let area = Rect {
            x: view.area.x + 1,
            width: view.area.width.saturating_sub(2),
            height: 1.min(view.area.height),
            ..view.area
        };
        frame.render_widget(
            Paragraph::new(Line::from("MUTE").red().bold()).right_aligned(),
            area,
        );
    }

    /// Renders the pause screen with overlay
    fn render_paused(&self, frame: &mut Frame, view: &RenderView) {
        let pause_text = vec![
            Line::from(""),
            if view.blink_on {
                Line::from("PAUSE").centered().bold().yellow()
            } else {
                Line::from("")
            },
            Line::from(""),
            Line::from("P/Esc: continue").centered().white(),
            Line::from("Enter: quit to title").centered().white(),
        ];

        let pause_area = centered(view.area, 30, 7);
        frame.render_widget(Clear, pause_area);
        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    /// Renders the game over screen
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let snapshot = view.snapshot;
        let game_over_text = vec![
            Line::from(""),
            Line::from("GAME OVER").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final Score: {:05}", snapshot.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Wave: {}", snapshot.wave))
                .centered()
                .cyan()
                .bold(),
            Line::from(""),
            Line::from("Press Enter to play again").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        let area = centered(view.area, 34, 10);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            area,
        );
    }
}

fn points_row<'a>(sprite: &'a str, label: &str, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{sprite:>8} "), Style::default().fg(color)),
        Span::styled(format!("{label:<19}"), Style::default().fg(Color::White)),
    ])
}

fn invader_color(kind: InvaderKind) -> Color {
    match kind {
        InvaderKind::Squid => Color::Magenta,
        InvaderKind::Crab => Color::Cyan,
        InvaderKind::Octopus => Color::Yellow,
    }
}

/// A `width` x `height` rect in the middle of `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draws one entity. The canvas y axis points up, world y points down.
fn draw(ctx: &mut Context, height: f64, drawable: Drawable) {
    match drawable {
        Drawable::Player(player) => draw_player(ctx, height, player),
        Drawable::Invader { invader, frame } => draw_invader(ctx, height, invader, frame),
        Drawable::Bullet(bullet) => draw_bullet(ctx, height, bullet),
        Drawable::BonusShip(ship) => draw_bonus_ship(ctx, height, ship),
        Drawable::Bunker(bunker) => draw_bunker(ctx, height, bunker),
    }
}

fn draw_player(ctx: &mut Context, height: f64, player: &Player) {
    let body = player.body();
    let color = if player.dead { Color::Red } else { Color::Green };
    ctx.print(
        body.x,
        height - body.y,
        Line::styled(player.sprite(), Style::default().fg(color).bold()),
    );
}

fn draw_invader(ctx: &mut Context, height: f64, invader: &Invader, frame: u8) {
    let body = invader.body();
    let line = if invader.is_exploding() {
        Line::styled("\\*/", Style::default().fg(Color::White))
    } else {
        Line::styled(
            invader.sprite(frame),
            Style::default().fg(invader_color(invader.kind)).bold(),
        )
    };
    ctx.print(body.x, height - body.y, line);
}

fn draw_bullet(ctx: &mut Context, height: f64, bullet: &Bullet) {
    let body = bullet.body();
    let color = match bullet.color {
        BulletColor::Green => Color::Green,
        BulletColor::White => Color::White,
    };
    let symbol = if bullet.is_exploding() { "*" } else { "|" };
    ctx.print(
        body.x,
        height - body.y,
        Line::styled(symbol, Style::default().fg(color)),
    );
}

fn draw_bonus_ship(ctx: &mut Context, height: f64, ship: &BonusShip) {
    let body = ship.body();
    let line = if ship.is_exploding() {
        Line::styled("*<+>*", Style::default().fg(Color::Yellow).bold())
    } else {
        Line::styled(ship.sprite(), Style::default().fg(Color::Red).bold())
    };
    ctx.print(body.x, height - body.y, line);
}

fn draw_bunker(ctx: &mut Context, height: f64, bunker: &Bunker) {
    let body = bunker.body();
    let style = Style::default().fg(Color::Green);
    let [top, bottom] = bunker.sprite_rows();
    ctx.print(body.x, height - body.y, Line::styled(top, style));
    ctx.print(
        body.x,
        height - body.y - body.height / 2.0,
        Line::styled(bottom, style),
    );
}
