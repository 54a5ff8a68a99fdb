#[cfg(test)]
mod tests {
    use crate::catalog::delibirdy;
    use crate::errors::{EncounterError, FlowError};
    use crate::flow::{FlowOutcome, FlowStep};
    use crate::pokemon::{PartyPokemon, PokemonId};
    use crate::requirements::SceneRequirement;
    use crate::rewards::Reward;
    use crate::scene::RunState;
    use crate::tests::common::{harness, start, Event};
    use pretty_assertions::assert_eq;
    use schema::{EncounterType, HeldItemKind, ModifierKind, Species};

    fn run() -> RunState {
        let mut run = RunState::new(
            vec![
                PartyPokemon::new(1, Species::Snorlax, 40).with_held_item(HeldItemKind::SitrusBerry, 1),
                PartyPokemon::new(2, Species::Lapras, 40).with_held_item(HeldItemKind::MysticWater, 1),
            ],
            40,
        );
        run.add_money(10_000);
        run
    }

    #[tokio::test]
    async fn test_paying_money_grants_amulet_coin() {
        // Arrange
        let mut h = harness();
        let mut run = run();
        let price = SceneRequirement::money(0, 2.0).required_money(&run).unwrap();
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        // Act
        session.show_intro(&mut h.services).await;
        let views = session.present_options(&run, &mut h.services).await;
        let selected = session.select_option(0, &mut run, &mut h.services).await.unwrap();
        let concluded = session.conclude(&mut run, &mut h.services).await.unwrap();

        // Assert
        assert!(views.iter().all(|view| view.enabled));
        assert_eq!(selected, FlowOutcome::Completed);
        assert_eq!(concluded, FlowOutcome::Completed);
        assert_eq!(run.money, 10_000 - price);
        assert_eq!(
            h.log.texts(),
            vec![
                "mysteryEncounters/delibirdy:intro".to_string(),
                "mysteryEncounters/delibirdy:option.1.selected".to_string(),
                "mysteryEncounters/delibirdy:outro".to_string(),
            ]
        );
        let grants: Vec<Event> = h
            .log
            .events()
            .into_iter()
            .filter(|event| matches!(event, Event::Granted(_) | Event::ShopRemoved))
            .collect();
        assert_eq!(
            grants,
            vec![Event::ShopRemoved, Event::Granted(Reward::Modifier(ModifierKind::AmuletCoin))]
        );

        let logged = run.encounters.encounter_log.last().unwrap();
        assert_eq!(logged.encounter_type, EncounterType::Delibirdy);
        assert_eq!(logged.selected_option, Some(0));
    }

    #[tokio::test]
    async fn test_gift_at_max_stacks_becomes_shell_bell() {
        let mut h = harness();
        let mut run = run();
        run.add_modifier(ModifierKind::AmuletCoin, 5);
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        session.select_option(0, &mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();

        assert!(run.party[0].holds(HeldItemKind::ShellBell));
        assert!(h.log.texts().contains(&"battle:rewardGain".to_string()));
        assert_eq!(h.log.count(|event| matches!(event, Event::Granted(_))), 0);
        assert_eq!(run.modifier_stack_count(ModifierKind::AmuletCoin), 5);
    }

    #[tokio::test]
    async fn test_berry_is_handed_over_for_candy_jar() {
        let mut h = harness();
        let mut run = run();
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        session.select_option(1, &mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();

        assert!(!run.party[0].holds(HeldItemKind::SitrusBerry));
        assert!(run.party[1].holds(HeldItemKind::MysticWater));
        assert_eq!(run.money, 10_000);
        assert!(session.instance().dialogue_tokens.get("chosenItem").is_some());
        assert_eq!(
            h.log.count(|event| *event == Event::Granted(Reward::Modifier(ModifierKind::CandyJar))),
            1
        );
    }

    #[tokio::test]
    async fn test_unmet_item_option_is_greyed_and_rejected() {
        // Arrange: the only held item is a berry, so nothing qualifies for option 3.
        let mut h = harness();
        let mut run = run();
        run.party[1].held_items.clear();
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        // Act
        let views = session.present_options(&run, &mut h.services).await;
        let result = session.select_option(2, &mut run, &mut h.services).await;

        // Assert
        assert!(!views[2].enabled);
        assert!(views[2].greyed_out);
        assert_eq!(views[2].label, "mysteryEncounters/delibirdy:option.3.label");
        assert!(matches!(
            result,
            Err(EncounterError::Flow(FlowError::OptionNotSelectable(2)))
        ));
        assert_eq!(session.instance().selected_option, None);
    }

    #[tokio::test]
    async fn test_rewards_are_paid_once() {
        let mut h = harness();
        let mut run = run();
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        session.select_option(0, &mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();

        assert_eq!(
            h.log.count(|event| matches!(event, Event::Granted(_))),
            1,
            "a second conclude must not grant again"
        );
    }

    #[tokio::test]
    async fn test_player_picks_member_and_item_to_give() {
        // Arrange: Snorlax carries a berry next to its Leftovers.
        let mut h = harness();
        let mut run = run();
        run.party[0].give_held_item(HeldItemKind::Leftovers, 1);
        h.picks.member(Some(PokemonId(1)));
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        // Act
        let selected = session.select_option(2, &mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();

        // Assert
        assert_eq!(selected, FlowOutcome::Completed);
        assert!(!run.party[0].holds(HeldItemKind::Leftovers));
        assert!(run.party[0].holds(HeldItemKind::SitrusBerry));
        assert!(run.party[1].holds(HeldItemKind::MysticWater));
        let tokens = &session.instance().dialogue_tokens;
        assert_eq!(tokens.get("option3PrimaryName"), Some("Snorlax"));
        assert_eq!(tokens.get("chosenItem"), Some("Leftovers"));
        assert!(h.log.events().contains(&Event::ListPrompt(
            "mysteryEncounters/delibirdy:option.3.selectPrompt".to_string(),
            vec!["Leftovers".to_string()],
        )));
        assert_eq!(
            h.log.count(|event| *event == Event::Granted(Reward::Modifier(ModifierKind::HealingCharm))),
            1
        );
    }

    #[tokio::test]
    async fn test_reviver_seed_is_traded_for_berry_pouch() {
        let mut h = harness();
        let mut run = run();
        run.party[0].held_items.clear();
        run.party[0].give_held_item(HeldItemKind::ReviverSeed, 1);
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        session.select_option(1, &mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();

        assert!(!run.party[0].holds(HeldItemKind::ReviverSeed));
        assert_eq!(
            h.log.count(|event| *event == Event::Granted(Reward::Modifier(ModifierKind::BerryPouch))),
            1
        );
    }

    #[tokio::test]
    async fn test_full_berry_pouch_becomes_shell_bell() {
        let mut h = harness();
        let mut run = run();
        run.add_modifier(ModifierKind::BerryPouch, 3);
        run.party[0].held_items.clear();
        run.party[0].give_held_item(HeldItemKind::ReviverSeed, 1);
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        session.select_option(1, &mut run, &mut h.services).await.unwrap();
        session.conclude(&mut run, &mut h.services).await.unwrap();

        assert!(!run.party[0].holds(HeldItemKind::ReviverSeed));
        assert!(run.party[0].holds(HeldItemKind::ShellBell));
        assert_eq!(h.log.count(|event| matches!(event, Event::Granted(_))), 0);
        assert_eq!(run.modifier_stack_count(ModifierKind::BerryPouch), 3);
    }

    #[tokio::test]
    async fn test_refused_member_halts_without_trading() {
        // Arrange: Lapras holds no berry, so it cannot be picked for option 2.
        let mut h = harness();
        let mut run = run();
        h.picks.member(Some(PokemonId(2)));
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        // Act
        let outcome = session.select_option(1, &mut run, &mut h.services).await.unwrap();

        // Assert
        assert_eq!(outcome, FlowOutcome::Halted(FlowStep::PreOptionPhase));
        let prompt = h
            .log
            .events()
            .into_iter()
            .find_map(|event| match event {
                Event::MemberPrompt(members) => Some(members),
                _ => None,
            })
            .unwrap();
        assert_eq!(prompt[0].refusal, None);
        assert_eq!(
            prompt[1].refusal.as_deref(),
            Some("mysteryEncounters/delibirdy:invalidSelection")
        );
        assert_eq!(
            h.log.texts(),
            vec!["mysteryEncounters/delibirdy:invalidSelection".to_string()]
        );
        assert!(run.party[0].holds(HeldItemKind::SitrusBerry));
        assert!(run.party[1].holds(HeldItemKind::MysticWater));
    }

    #[tokio::test]
    async fn test_backing_out_of_item_list_keeps_the_item() {
        let mut h = harness();
        let mut run = run();
        h.picks.entry(None);
        let mut session = start(delibirdy().unwrap(), &mut run, 42);

        let outcome = session.select_option(1, &mut run, &mut h.services).await.unwrap();

        assert_eq!(outcome, FlowOutcome::Halted(FlowStep::PreOptionPhase));
        assert!(run.party[0].holds(HeldItemKind::SitrusBerry));
        assert_eq!(session.instance().dialogue_tokens.get("chosenItem"), None);
    }
}
