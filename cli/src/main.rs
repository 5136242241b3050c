use clanboard_cli::commands;
use clanboard_cli::logging;
use clanboard_cli::readline;
use clanboard_cli::CliContext;
use clanboard_core::{
    parse_server, BoardEdit, CancelScope, GameDate, ResolveRequest, Role, SaveLoadAction, SubscribeTarget,
};
use clanboard_types::{BossSlot, MemberId, Server};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let ctx = CliContext::new()?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

fn boss_arg(value: &str) -> Result<BossSlot, String> {
    let number: u8 = value.parse().map_err(|_| format!("not a boss number: {value}"))?;
    BossSlot::try_from(number)
}

fn server_arg(value: &str) -> Result<Server, String> {
    parse_server(value).ok_or_else(|| format!("unknown server: {value}"))
}

#[derive(Clone, Copy)]
struct EditArg(BossSlot, BoardEdit);

/// `N=HEALTH` sets boss N, `N=next:HEALTH` moves it into the next cycle
fn edit_arg(value: &str) -> Result<EditArg, String> {
    let (boss, health) = value
        .split_once('=')
        .ok_or_else(|| format!("expected N=HEALTH, got {value}"))?;
    let boss = boss_arg(boss)?;
    let (next, health) = match health.strip_prefix("next:") {
        Some(rest) => (true, rest),
        None => (false, health),
    };
    let health: u64 = health.parse().map_err(|_| format!("not a health value: {health}"))?;
    let edit = if next {
        BoardEdit::NextCycle(health)
    } else {
        BoardEdit::Current(health)
    };
    Ok(EditArg(boss, edit))
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Owner,
    Admin,
    Member,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Owner => Role::Owner,
            RoleArg::Admin => Role::Admin,
            RoleArg::Member => Role::Member,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SlAction {
    Record,
    Check,
    Cancel,
}

#[derive(Parser)]
#[command(version, about = "clan battle progress shell")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the group to act in
    Group { id: i64 },
    /// Select the member to act as
    As { member: MemberId },
    Create {
        #[arg(short, long, value_parser = server_arg)]
        server: Option<Server>,
        #[arg(short, long)]
        name: Option<String>,
    },
    Delete,
    Join {
        #[arg(short, long)]
        member: Option<MemberId>,
        #[arg(short, long)]
        nickname: Option<String>,
        #[arg(short, long, value_enum, default_value = "member")]
        role: RoleArg,
    },
    Drop { members: Vec<MemberId> },
    Server {
        #[arg(value_parser = server_arg)]
        server: Server,
    },
    Threshold { value: u64 },
    Echo { bits: u32 },
    Status,
    Apply {
        #[arg(value_parser = boss_arg)]
        boss: BossSlot,
        #[arg(short, long)]
        r#continue: bool,
        #[arg(short, long)]
        behalf: Option<MemberId>,
    },
    Cancel {
        #[arg(short, long, value_parser = boss_arg)]
        boss: Option<BossSlot>,
        #[arg(short, long)]
        all: bool,
    },
    Report { seconds: u32, damage: u64 },
    ReportClear,
    Resolve {
        damage: Option<i64>,
        #[arg(short, long)]
        defeat: bool,
        #[arg(short, long, value_parser = boss_arg)]
        boss: Option<BossSlot>,
        #[arg(short, long)]
        r#continue: bool,
        #[arg(short, long)]
        yesterday: bool,
        #[arg(long)]
        behalf: Option<MemberId>,
        #[arg(short, long)]
        message: Option<String>,
    },
    Undo,
    Tree {
        #[arg(short, long, value_parser = boss_arg)]
        boss: Option<BossSlot>,
        note: Option<String>,
        #[arg(long)]
        behalf: Option<MemberId>,
    },
    Untree,
    TreeList {
        #[arg(value_parser = boss_arg)]
        boss: Option<BossSlot>,
    },
    /// Subscribe to a boss, or pass `table` to list subscriptions
    Subscribe {
        target: String,
        note: Option<String>,
    },
    Unsubscribe {
        #[arg(value_parser = boss_arg)]
        boss: BossSlot,
        #[arg(short, long)]
        member: Option<MemberId>,
        #[arg(short, long)]
        all: bool,
    },
    Switch { slot: u32 },
    Clear { slot: Option<u32> },
    Backup,
    Slots,
    Modify {
        #[arg(short, long)]
        cycle: Option<u32>,
        #[arg(value_parser = edit_arg)]
        edits: Vec<EditArg>,
    },
    Sl {
        #[arg(value_enum, default_value = "record")]
        action: SlAction,
    },
    Remind {
        members: Vec<MemberId>,
        #[arg(short, long)]
        private: bool,
    },
    Progress {
        #[arg(short, long)]
        date: Option<i32>,
    },
    Scores {
        #[arg(short, long)]
        slot: Option<u32>,
    },
    Records {
        #[arg(short, long)]
        member: Option<MemberId>,
        #[arg(short, long)]
        all_slots: bool,
    },
    Wait { seconds: Option<u64> },
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "clanboard".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let result = match cli.command {
        Some(Commands::Group { id }) => {
            ctx.set_group(id).await;
            Ok(())
        }
        Some(Commands::As { member }) => {
            ctx.set_member(member).await;
            Ok(())
        }
        Some(Commands::Create { server, name }) => commands::create(ctx, server, name).await,
        Some(Commands::Delete) => commands::delete(ctx).await,
        Some(Commands::Join { member, nickname, role }) => {
            commands::join(ctx, member, nickname, role.into()).await
        }
        Some(Commands::Drop { members }) => commands::drop_members(ctx, &members).await,
        Some(Commands::Server { server }) => commands::set_server(ctx, server).await,
        Some(Commands::Threshold { value }) => commands::set_threshold(ctx, value).await,
        Some(Commands::Echo { bits }) => commands::set_echo(ctx, bits).await,
        Some(Commands::Status) => commands::status(ctx).await,
        Some(Commands::Apply { boss, r#continue, behalf }) => {
            commands::apply(ctx, boss, r#continue, behalf).await
        }
        Some(Commands::Cancel { boss, all }) => {
            let scope = match (boss, all) {
                (_, true) => CancelScope::All,
                (Some(boss), false) => CancelScope::Boss(boss),
                (None, false) => CancelScope::Own,
            };
            commands::cancel(ctx, scope).await
        }
        Some(Commands::Report { seconds, damage }) => commands::report(ctx, seconds, damage).await,
        Some(Commands::ReportClear) => commands::report_clear(ctx).await,
        Some(Commands::Resolve {
            damage,
            defeat,
            boss,
            r#continue,
            yesterday,
            behalf,
            message,
        }) => {
            commands::resolve(ctx, |caller| {
                let mut request = match (defeat, damage) {
                    (true, _) => ResolveRequest::defeat(caller),
                    (false, Some(damage)) => ResolveRequest::damage(caller, damage),
                    (false, None) => ResolveRequest {
                        defeat: false,
                        ..ResolveRequest::defeat(caller)
                    },
                };
                if let Some(boss) = boss {
                    request = request.on(boss);
                }
                if let Some(member) = behalf {
                    request = request.on_behalf_of(member);
                }
                if r#continue {
                    request = request.continued();
                }
                if yesterday {
                    request = request.previous_day();
                }
                if let Some(message) = message {
                    request = request.message(message);
                }
                request
            })
            .await
        }
        Some(Commands::Undo) => commands::undo(ctx).await,
        Some(Commands::Tree { boss, note, behalf }) => commands::tree(ctx, boss, note, behalf).await,
        Some(Commands::Untree) => commands::untree(ctx).await,
        Some(Commands::TreeList { boss }) => commands::tree_list(ctx, boss).await,
        Some(Commands::Subscribe { target, note }) => {
            let target = if target.eq_ignore_ascii_case("table") {
                SubscribeTarget::Table
            } else {
                SubscribeTarget::Boss(boss_arg(&target)?)
            };
            commands::subscribe(ctx, target, note).await
        }
        Some(Commands::Unsubscribe { boss, member, all }) => {
            let member = if all {
                None
            } else {
                Some(match member {
                    Some(member) => member,
                    None => ctx.actor().await.member,
                })
            };
            commands::unsubscribe(ctx, boss, member).await
        }
        Some(Commands::Switch { slot }) => commands::switch_slot(ctx, slot).await,
        Some(Commands::Clear { slot }) => commands::clear_slot(ctx, slot).await,
        Some(Commands::Backup) => commands::backup(ctx).await,
        Some(Commands::Slots) => commands::slots(ctx).await,
        Some(Commands::Modify { cycle, edits }) => {
            let edits: Vec<_> = edits.into_iter().map(|EditArg(boss, edit)| (boss, edit)).collect();
            commands::modify(ctx, cycle, &edits).await
        }
        Some(Commands::Sl { action }) => {
            let action = match action {
                SlAction::Record => SaveLoadAction::Record,
                SlAction::Check => SaveLoadAction::Check,
                SlAction::Cancel => SaveLoadAction::Cancel,
            };
            commands::save_load(ctx, action).await
        }
        Some(Commands::Remind { members, private }) => commands::remind(ctx, &members, private).await,
        Some(Commands::Progress { date }) => commands::progress(ctx, date.map(GameDate)).await,
        Some(Commands::Scores { slot }) => commands::scores(ctx, slot).await,
        Some(Commands::Records { member, all_slots }) => commands::records(ctx, member, all_slots).await,
        Some(Commands::Wait { seconds }) => commands::wait(ctx, seconds).await,
        Some(Commands::Config) => {
            commands::show_config(ctx).await;
            Ok(())
        }
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => Ok(()),
    };
    result.map_err(|err| format!("error: {err}"))?;
    Ok(false)
}
