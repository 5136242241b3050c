use std::io::Write;
use std::time::Duration;

use clanboard_core::{
    BoardEdit, CancelScope, ChallengeFilter, EngineError, GameDate, ReportClearOutcome, ResolveRequest, Role,
    SaveLoadAction, SaveLoadOutcome, SubscribeOutcome, SubscribeTarget, WaitOutcome,
};
use clanboard_types::{BoardView, BossSlot, EchoFlags, MemberId, Server, format_thousands};

use crate::CliContext;

type CommandResult = Result<(), EngineError>;

fn print_board(board: &BoardView) {
    println!("Cycle {} (stage {})", board.cycle, board.stage + 1);
    for boss in &board.bosses {
        let marker = if boss.is_next { " [next cycle]" } else { "" };
        if boss.reachable {
            println!(
                "  {}: {:>12} / {:<12}{}",
                boss.slot,
                format_thousands(boss.health),
                format_thousands(boss.full_health),
                marker
            );
        } else {
            println!("  {}: unreachable", boss.slot);
        }
    }
}

pub async fn status(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    let snapshot = ctx.engine.snapshot(actor.group).await?;
    println!(
        "{} [{}] data slot {}",
        snapshot.name.as_deref().unwrap_or("clan"),
        snapshot.server,
        snapshot.data_slot
    );
    print_board(&snapshot.board);
    if !snapshot.sessions.is_empty() {
        println!("Challenging:");
        for s in &snapshot.sessions {
            let mut line = format!("  {} on boss {}", s.member, s.boss);
            if s.is_continue {
                line.push_str(" (compensation)");
            }
            if s.pending_damage > 0 || s.paused_seconds > 0 {
                line.push_str(&format!(
                    ", paused at {}s with {}",
                    s.paused_seconds,
                    format_thousands(s.pending_damage)
                ));
            }
            if s.on_tree {
                line.push_str(", on the tree");
                if let Some(note) = &s.note {
                    line.push_str(&format!(": {note}"));
                }
            }
            println!("{line}");
        }
    }
    if !snapshot.subscriptions.is_empty() {
        println!("Subscribed:");
        for sub in &snapshot.subscriptions {
            println!("  boss {}: {} {}", sub.boss, sub.member, sub.note);
        }
    }
    Ok(())
}

pub async fn create(ctx: &CliContext, server: Option<Server>, name: Option<String>) -> CommandResult {
    let actor = ctx.actor().await;
    let server = server.unwrap_or(ctx.config.default_server);
    ctx.engine.create_group(actor.group, server, name).await?;
    println!("Clan created for group {} on {server}", actor.group);
    Ok(())
}

pub async fn delete(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine.delete_group(actor.group, actor.member).await?;
    println!("Clan deleted");
    Ok(())
}

pub async fn join(ctx: &CliContext, member: Option<MemberId>, nickname: Option<String>, role: Role) -> CommandResult {
    let actor = ctx.actor().await;
    let joined = ctx
        .engine
        .join(actor.group, member.unwrap_or(actor.member), nickname, role)
        .await?;
    println!("{} joined as {:?}", joined.display_name(), joined.role);
    Ok(())
}

pub async fn drop_members(ctx: &CliContext, members: &[MemberId]) -> CommandResult {
    let actor = ctx.actor().await;
    let removed = ctx.engine.drop_members(actor.group, actor.member, members).await?;
    println!("Removed {removed} member(s)");
    Ok(())
}

pub async fn set_server(ctx: &CliContext, server: Server) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine.set_server(actor.group, actor.member, server).await?;
    println!("Server set to {server}");
    Ok(())
}

pub async fn set_threshold(ctx: &CliContext, threshold: u64) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine.set_threshold(actor.group, actor.member, threshold).await?;
    println!("Score threshold set to {}", format_thousands(threshold));
    Ok(())
}

pub async fn set_echo(ctx: &CliContext, bits: u32) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine
        .set_echo_flags(actor.group, actor.member, EchoFlags(bits))
        .await?;
    println!("Echo flags set to {bits:#b}");
    Ok(())
}

pub async fn apply(ctx: &CliContext, boss: BossSlot, is_continue: bool, behalf: Option<MemberId>) -> CommandResult {
    let actor = ctx.actor().await;
    let outcome = ctx
        .engine
        .apply(actor.group, actor.member, boss, is_continue, behalf)
        .await?;
    println!("{} is challenging boss {} ({:?})", outcome.member, outcome.boss, outcome.admission);
    Ok(())
}

pub async fn cancel(ctx: &CliContext, scope: CancelScope) -> CommandResult {
    let actor = ctx.actor().await;
    let removed = ctx.engine.cancel(actor.group, actor.member, scope).await?;
    println!("Cancelled {removed} challenge(s)");
    Ok(())
}

pub async fn report(ctx: &CliContext, seconds: u32, damage: u64) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine.report(actor.group, actor.member, seconds, damage).await?;
    println!("Reported {}s left with {} damage", seconds, format_thousands(damage));
    Ok(())
}

pub async fn report_clear(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    match ctx.engine.report_clear(actor.group, actor.member).await? {
        ReportClearOutcome::Cleared => println!("Report cleared"),
        ReportClearOutcome::NothingToClear => println!("Nothing to clear"),
    }
    Ok(())
}

pub async fn resolve(ctx: &CliContext, build: impl FnOnce(MemberId) -> ResolveRequest) -> CommandResult {
    let actor = ctx.actor().await;
    let outcome = ctx.engine.resolve(actor.group, build(actor.member)).await?;
    println!("#{} {}", outcome.record.seq, outcome.message);
    Ok(())
}

pub async fn undo(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    let outcome = ctx.engine.undo(actor.group, actor.member).await?;
    println!("{}", outcome.message);
    Ok(())
}

pub async fn tree(
    ctx: &CliContext,
    boss: Option<BossSlot>,
    note: Option<String>,
    behalf: Option<MemberId>,
) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine
        .enter_tree(actor.group, actor.member, boss, note, behalf)
        .await?;
    println!("On the tree");
    Ok(())
}

pub async fn untree(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine.exit_tree(actor.group, actor.member).await?;
    println!("Off the tree");
    Ok(())
}

pub async fn tree_list(ctx: &CliContext, boss: Option<BossSlot>) -> CommandResult {
    let actor = ctx.actor().await;
    let tree = ctx.engine.tree(actor.group, boss).await?;
    if tree.is_empty() {
        println!("Nobody is on the tree");
    }
    for s in &tree {
        println!("  {} on boss {} {}", s.member, s.boss, s.note.as_deref().unwrap_or(""));
    }
    Ok(())
}

pub async fn subscribe(ctx: &CliContext, target: SubscribeTarget, note: Option<String>) -> CommandResult {
    let actor = ctx.actor().await;
    match ctx.engine.subscribe(actor.group, actor.member, target, note).await? {
        SubscribeOutcome::Subscribed(boss) => println!("Subscribed to boss {boss}"),
        SubscribeOutcome::Table(rows) => {
            for row in rows {
                println!("  boss {}: {} {}", row.boss, row.member, row.note);
            }
        }
    }
    Ok(())
}

pub async fn unsubscribe(ctx: &CliContext, boss: BossSlot, member: Option<MemberId>) -> CommandResult {
    let actor = ctx.actor().await;
    let removed = ctx
        .engine
        .subscribe_cancel(actor.group, actor.member, boss, member)
        .await?;
    println!("Removed {removed} subscription(s)");
    Ok(())
}

pub async fn switch_slot(ctx: &CliContext, slot: u32) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine.switch_data_slot(actor.group, actor.member, slot).await?;
    println!("Now on data slot {slot}");
    Ok(())
}

pub async fn clear_slot(ctx: &CliContext, slot: Option<u32>) -> CommandResult {
    let actor = ctx.actor().await;
    let purged = ctx.engine.clear_data_slot(actor.group, actor.member, slot).await?;
    println!("Cleared; {purged} record(s) deleted");
    Ok(())
}

pub async fn backup(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    let slot = ctx.engine.backup(actor.group, actor.member).await?;
    println!("Data slot {slot} backed up");
    Ok(())
}

pub async fn slots(ctx: &CliContext) -> CommandResult {
    let actor = ctx.actor().await;
    for (slot, count) in ctx.engine.record_counts(actor.group).await? {
        println!("  slot {slot}: {count} record(s)");
    }
    println!("First unused slot: {}", ctx.engine.first_unused_slot(actor.group).await?);
    Ok(())
}

pub async fn modify(ctx: &CliContext, cycle: Option<u32>, edits: &[(BossSlot, BoardEdit)]) -> CommandResult {
    let actor = ctx.actor().await;
    ctx.engine
        .modify_board(actor.group, actor.member, cycle, edits)
        .await?;
    status(ctx).await
}

pub async fn save_load(ctx: &CliContext, action: SaveLoadAction) -> CommandResult {
    let actor = ctx.actor().await;
    match ctx.engine.save_load(actor.group, actor.member, action).await? {
        SaveLoadOutcome::Recorded => println!("Save-load recorded for today"),
        SaveLoadOutcome::Marked(true) => println!("Save-load already used today"),
        SaveLoadOutcome::Marked(false) => println!("Save-load not used today"),
        SaveLoadOutcome::Cancelled => println!("Save-load cancelled"),
    }
    Ok(())
}

pub async fn remind(ctx: &CliContext, members: &[MemberId], private: bool) -> CommandResult {
    let actor = ctx.actor().await;
    let sent = ctx.engine.remind(actor.group, actor.member, members, private).await?;
    println!("Reminded {sent} member(s)");
    Ok(())
}

pub async fn progress(ctx: &CliContext, date: Option<GameDate>) -> CommandResult {
    let actor = ctx.actor().await;
    let progress = ctx.engine.daily_progress(actor.group, date).await?;
    println!(
        "{:.1} / {} attempts used, {} compensation pending",
        progress.total_attempts(),
        progress.capacity,
        progress.pending_compensation
    );
    for (halves, members) in &progress.histogram {
        println!("  {:.1} attempts: {members} member(s)", f64::from(*halves) / 2.0);
    }
    if !progress.idle.is_empty() {
        println!("  idle: {:?}", progress.idle);
    }
    Ok(())
}

pub async fn scores(ctx: &CliContext, slot: Option<u32>) -> CommandResult {
    let actor = ctx.actor().await;
    println!("{:<16} {:>6} {:>5} {:>5} {:>5}", "Member", "Score", "Full", "Tail", "Comp");
    for row in ctx.engine.score_table(actor.group, slot).await? {
        println!(
            "{:<16} {:>6.1} {:>5} {:>5} {:>5}",
            row.member,
            row.score(),
            row.full,
            row.tail_kills,
            row.compensation
        );
    }
    Ok(())
}

pub async fn records(ctx: &CliContext, member: Option<MemberId>, all_slots: bool) -> CommandResult {
    let actor = ctx.actor().await;
    let mut filter = ChallengeFilter::group(actor.group);
    if !all_slots {
        filter = filter.slot(ctx.engine.snapshot(actor.group).await?.data_slot);
    }
    if let Some(member) = member {
        filter = filter.member(member);
    }
    for record in ctx.engine.challenges(&filter).await? {
        println!(
            "#{:<5} {} cycle {} boss {} {:>12} {} by {}",
            record.seq,
            record.date,
            record.cycle,
            record.boss,
            format_thousands(record.damage),
            record.kind().label(),
            record.member
        );
    }
    Ok(())
}

pub async fn wait(ctx: &CliContext, seconds: Option<u64>) -> CommandResult {
    let actor = ctx.actor().await;
    match ctx.engine.wait(actor.group, seconds.map(Duration::from_secs)).await? {
        WaitOutcome::Changed(payload) => {
            println!("{}", payload.message);
            print_board(&payload.board);
        }
        WaitOutcome::Unchanged => println!("No change"),
    }
    Ok(())
}

pub async fn show_config(ctx: &CliContext) {
    let actor = ctx.actor().await;
    println!("Acting as member {} in group {}", actor.member, actor.group);
    println!("{:#?}", ctx.config);
}

pub fn exit() {
    write!(std::io::stdout(), "quitting...").ok();
    std::io::stdout().flush().ok();
}
