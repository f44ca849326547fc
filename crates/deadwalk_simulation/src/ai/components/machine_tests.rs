//! Tests for the generic state machine driver.

#[cfg(test)]
mod tests {
    use super::super::machine::{AiState, AiStateType, MachineKind, StateMachine, TriggerEventKind};

    /// Минимальная машина для тестов: контекст = журнал вызовов + "скрипт" ответов
    struct TestMachine;

    #[derive(Default)]
    struct TestContext {
        journal: Vec<String>,
        next: Option<AiStateType>,
        contacts: u32,
    }

    impl MachineKind for TestMachine {
        type Context<'a> = TestContext;
        type Contact = u32;
    }

    struct ScriptedState {
        state_type: AiStateType,
        tag: &'static str,
    }

    impl ScriptedState {
        fn boxed(state_type: AiStateType, tag: &'static str) -> Box<dyn AiState<TestMachine>> {
            Box::new(Self { state_type, tag })
        }
    }

    impl AiState<TestMachine> for ScriptedState {
        fn state_type(&self) -> AiStateType {
            self.state_type
        }

        fn on_enter(&mut self, ctx: &mut TestContext) {
            ctx.journal.push(format!("enter {}", self.tag));
        }

        fn on_exit(&mut self, ctx: &mut TestContext) {
            ctx.journal.push(format!("exit {}", self.tag));
        }

        fn on_update(&mut self, ctx: &mut TestContext) -> AiStateType {
            ctx.journal.push(format!("update {}", self.tag));
            ctx.next.take().unwrap_or(self.state_type)
        }

        fn on_trigger_event(&mut self, ctx: &mut TestContext, _kind: TriggerEventKind, contact: &u32) {
            ctx.contacts += *contact;
        }
    }

    fn machine_with(types: &[(AiStateType, &'static str)], initial: AiStateType) -> StateMachine<TestMachine> {
        let mut machine = StateMachine::new(initial);
        for (state_type, tag) in types {
            machine.register_state(ScriptedState::boxed(*state_type, tag));
        }
        machine
    }

    #[test]
    fn test_first_registration_wins() {
        let mut machine = machine_with(&[(AiStateType::Idle, "idle-1")], AiStateType::Idle);
        assert!(!machine.register_state(ScriptedState::boxed(AiStateType::Idle, "idle-2")));

        let mut ctx = TestContext::default();
        machine.start(&mut ctx);
        machine.tick(&mut ctx);

        assert_eq!(ctx.journal, vec!["enter idle-1", "update idle-1"]);
    }

    #[test]
    fn test_tick_without_active_state_is_noop() {
        let mut machine = machine_with(&[(AiStateType::Patrol, "patrol")], AiStateType::Idle);
        let mut ctx = TestContext::default();

        machine.start(&mut ctx);
        assert!(machine.is_inert());

        ctx.next = Some(AiStateType::Patrol);
        assert_eq!(machine.tick(&mut ctx), None);
        assert!(ctx.journal.is_empty());
    }

    #[test]
    fn test_transition_calls_exit_then_enter() {
        let mut machine = machine_with(
            &[(AiStateType::Idle, "idle"), (AiStateType::Pursuit, "pursuit")],
            AiStateType::Idle,
        );
        let mut ctx = TestContext::default();
        machine.start(&mut ctx);

        ctx.next = Some(AiStateType::Pursuit);
        let transition = machine.tick(&mut ctx).expect("transition expected");

        assert_eq!(transition.from, AiStateType::Idle);
        assert_eq!(transition.requested, AiStateType::Pursuit);
        assert_eq!(transition.active, Some(AiStateType::Pursuit));
        assert!(!transition.is_fallback());
        assert_eq!(machine.current_type(), AiStateType::Pursuit);
        assert_eq!(
            ctx.journal,
            vec!["enter idle", "update idle", "exit idle", "enter pursuit"]
        );
    }

    #[test]
    fn test_unregistered_target_falls_back_to_idle_but_records_requested_type() {
        let mut machine = machine_with(
            &[(AiStateType::Idle, "idle"), (AiStateType::Patrol, "patrol")],
            AiStateType::Patrol,
        );
        let mut ctx = TestContext::default();
        machine.start(&mut ctx);

        ctx.next = Some(AiStateType::Feeding);
        let transition = machine.tick(&mut ctx).expect("transition expected");

        // Реально работает Idle, а записан запрошенный Feeding
        assert!(transition.is_fallback());
        assert_eq!(machine.active_type(), Some(AiStateType::Idle));
        assert_eq!(machine.current_type(), AiStateType::Feeding);
        assert_eq!(ctx.journal[2..], ["exit patrol", "enter idle"]);
    }

    #[test]
    fn test_fallback_divergence_reenters_idle_next_tick() {
        let mut machine = machine_with(&[(AiStateType::Idle, "idle")], AiStateType::Idle);
        let mut ctx = TestContext::default();
        machine.start(&mut ctx);

        ctx.next = Some(AiStateType::Dead);
        machine.tick(&mut ctx);
        ctx.journal.clear();

        // Idle возвращает Idle, но записан Dead → снова exit/enter Idle
        let transition = machine.tick(&mut ctx).expect("quirk transition");
        assert_eq!(transition.from, AiStateType::Dead);
        assert_eq!(transition.requested, AiStateType::Idle);
        assert_eq!(ctx.journal, vec!["update idle", "exit idle", "enter idle"]);
        assert_eq!(machine.current_type(), AiStateType::Idle);
    }

    #[test]
    fn test_missing_idle_leaves_machine_inert() {
        let mut machine = machine_with(&[(AiStateType::Patrol, "patrol")], AiStateType::Patrol);
        let mut ctx = TestContext::default();
        machine.start(&mut ctx);

        ctx.next = Some(AiStateType::Attack);
        let transition = machine.tick(&mut ctx).expect("transition expected");

        assert_eq!(transition.active, None);
        assert!(machine.is_inert());
        assert_eq!(machine.current_type(), AiStateType::Attack);

        // Дальше OnUpdate больше не вызывается
        ctx.journal.clear();
        assert_eq!(machine.tick(&mut ctx), None);
        assert!(ctx.journal.is_empty());
    }

    #[test]
    fn test_suspend_and_force_state() {
        let mut machine = machine_with(
            &[(AiStateType::Idle, "idle"), (AiStateType::Alerted, "alerted")],
            AiStateType::Idle,
        );
        let mut ctx = TestContext::default();
        machine.start(&mut ctx);

        machine.suspend(&mut ctx);
        assert!(machine.is_inert());
        assert_eq!(machine.current_type(), AiStateType::None);

        assert!(machine.force_state(AiStateType::Alerted, &mut ctx));
        assert_eq!(machine.active_type(), Some(AiStateType::Alerted));
        assert_eq!(machine.current_type(), AiStateType::Alerted);
        assert_eq!(ctx.journal, vec!["enter idle", "exit idle", "enter alerted"]);

        assert!(!machine.force_state(AiStateType::Feeding, &mut ctx));
    }

    #[test]
    fn test_trigger_events_reach_active_state_only() {
        let mut machine = machine_with(&[(AiStateType::Idle, "idle")], AiStateType::Idle);
        let mut ctx = TestContext::default();

        machine.trigger_event(&mut ctx, TriggerEventKind::Enter, &5);
        assert_eq!(ctx.contacts, 0);

        machine.start(&mut ctx);
        machine.trigger_event(&mut ctx, TriggerEventKind::Stay, &5);
        assert_eq!(ctx.contacts, 5);
    }
}
