//! Control table: on-screen widgets to view commands.
//!
//! Widgets are addressed by their layout names. The table maps a
//! (control, event kind) pair to a [`Binding`]; the event payload (checkbox
//! state, slider value, mouse button) completes it into a [`ViewCommand`]
//! that [`crate::BattleView::execute`] carries out.

use std::collections::HashMap;

use battle_core::{
    AimingMode, BattleMode, BehaviorMode, BodyPart, Hand, MovementMode, PsiStatus,
    ReserveShotMode,
};
use crossterm::event::MouseButton;
use tracing::warn;

use crate::camera::{LayerDrawing, UpdateSpeed};
use crate::error::ViewError;
use crate::posture::PostureCommand;

/// Named widgets of the battle screen.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlId {
    #[strum(serialize = "BUTTON_SPEED0")]
    ButtonSpeed0,
    #[strum(serialize = "BUTTON_SPEED1")]
    ButtonSpeed1,
    #[strum(serialize = "BUTTON_SPEED2")]
    ButtonSpeed2,
    #[strum(serialize = "BUTTON_SPEED3")]
    ButtonSpeed3,
    ButtonEndturn,
    ButtonMoveGroup,
    ButtonMoveIndividually,
    ButtonLayerUp,
    ButtonLayerDown,
    #[strum(serialize = "BUTTON_LAYER_1")]
    ButtonLayer1,
    #[strum(serialize = "BUTTON_LAYER_2")]
    ButtonLayer2,
    #[strum(serialize = "BUTTON_LAYER_3")]
    ButtonLayer3,
    #[strum(serialize = "BUTTON_LAYER_4")]
    ButtonLayer4,
    #[strum(serialize = "BUTTON_LAYER_5")]
    ButtonLayer5,
    #[strum(serialize = "BUTTON_LAYER_6")]
    ButtonLayer6,
    #[strum(serialize = "BUTTON_LAYER_7")]
    ButtonLayer7,
    #[strum(serialize = "BUTTON_LAYER_8")]
    ButtonLayer8,
    #[strum(serialize = "BUTTON_LAYER_9")]
    ButtonLayer9,
    ButtonLayering,
    ButtonFollowAgent,
    ButtonToggleStratmap,
    ButtonShowOptions,
    ButtonShowLog,
    ButtonZoomEvent,

    OverlayLeftHand,
    OverlayRightHand,
    ButtonLeftHandDrop,
    ButtonRightHandDrop,
    ButtonLeftHandThrow,
    ButtonRightHandThrow,

    // Priming and psi panels
    ButtonOk,
    ButtonCancel,
    DelaySlider,
    RangeSlider,
    ButtonControl,
    ButtonPanic,
    ButtonStun,
    ButtonProbe,

    MedikitHeadButton,
    MedikitBodyButton,
    MedikitLeftHandButton,
    MedikitRightHandButton,
    MedikitLegsButton,

    // Soldier orders
    ButtonCeaseFire,
    ButtonAimed,
    ButtonSnap,
    ButtonAuto,
    ButtonKneel,
    ButtonProne,
    ButtonWalk,
    ButtonRun,
    ButtonEvasive,
    ButtonNormal,
    ButtonAggressive,
    ButtonReserveAimed,
    ButtonReserveSnap,
    ButtonReserveAuto,
    ButtonReserveKneel,
}

impl ControlId {
    /// Looks a control up by its layout name.
    pub fn from_name(name: &str) -> Result<Self, ViewError> {
        name.parse()
            .map_err(|_| ViewError::UnknownControl(name.to_owned()))
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Widget event, with whatever value the widget reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(name(ControlEventKind), derive(Hash))]
pub enum ControlEvent {
    ButtonClick,
    MouseDown(MouseButton),
    CheckBoxChanged(bool),
    /// A radio button became the selected one.
    CheckBoxSelected,
    TriStateChanged(u8),
    ScrollChanged(i32),
}

impl ControlEventKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ButtonClick => "button_click",
            Self::MouseDown => "mouse_down",
            Self::CheckBoxChanged => "check_box_changed",
            Self::CheckBoxSelected => "check_box_selected",
            Self::TriStateChanged => "tri_state_changed",
            Self::ScrollChanged => "scroll_changed",
        }
    }
}

/// Everything a widget can ask the view to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewCommand {
    SetSpeed(UpdateSpeed),
    EndTurn,
    SetGroupMove(bool),
    LayerUp,
    LayerDown,
    SetLayer(i32),
    SetLayerDrawing(LayerDrawing),
    SetFollowAgent(bool),
    SetStrategyMap(bool),
    ShowOptions,
    ShowLog,
    ZoomLastEvent,
    UseItem { hand: Hand, automatic: bool },
    DropOrPickUp(Hand),
    Throw(Hand),
    /// Confirm of the open side panel.
    Confirm,
    /// Cancel of the open side panel.
    Cancel,
    SetPrimingDelay(i32),
    SetPrimingRange(i32),
    PsiMode(PsiStatus),
    Heal(BodyPart),
    Posture(PostureCommand),
    /// Answer to the continue-remaining-orders prompt.
    AnswerContinue(bool),
}

/// Table entry; completed by the event payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Command(ViewCommand),
    /// Left button uses manually, right button automatically.
    UseHand(Hand),
    FollowAgent,
    StrategyMap,
    Layering,
    PrimingDelay,
    PrimingRange,
}

impl Binding {
    fn complete(self, event: ControlEvent) -> Option<ViewCommand> {
        match (self, event) {
            (Self::Command(command), _) => Some(command),
            (Self::UseHand(hand), ControlEvent::MouseDown(button)) => match button {
                MouseButton::Left => Some(ViewCommand::UseItem {
                    hand,
                    automatic: false,
                }),
                MouseButton::Right => Some(ViewCommand::UseItem {
                    hand,
                    automatic: true,
                }),
                MouseButton::Middle => None,
            },
            (Self::FollowAgent, ControlEvent::CheckBoxChanged(on)) => {
                Some(ViewCommand::SetFollowAgent(on))
            }
            (Self::StrategyMap, ControlEvent::CheckBoxChanged(on)) => {
                Some(ViewCommand::SetStrategyMap(on))
            }
            (Self::Layering, ControlEvent::TriStateChanged(state)) => {
                LayerDrawing::from_button_state(state).map(ViewCommand::SetLayerDrawing)
            }
            (Self::PrimingDelay, ControlEvent::ScrollChanged(value)) => {
                Some(ViewCommand::SetPrimingDelay(value))
            }
            (Self::PrimingRange, ControlEvent::ScrollChanged(value)) => {
                Some(ViewCommand::SetPrimingRange(value))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ControlTable {
    bindings: HashMap<(ControlId, ControlEventKind), Binding>,
}

impl ControlTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bindings of the battle screen. Speed buttons only exist in real
    /// time; end turn and reserve buttons only in turn-based battles.
    pub fn standard(mode: BattleMode) -> Self {
        use ControlEventKind::{ButtonClick, CheckBoxChanged, CheckBoxSelected, MouseDown};
        use ControlId as C;
        use ViewCommand as V;

        let mut table = Self::empty();
        let mut command =
            |control, kind, view_command| table.bind(control, kind, Binding::Command(view_command));

        command(C::ButtonMoveGroup, ButtonClick, V::SetGroupMove(true));
        command(C::ButtonMoveIndividually, ButtonClick, V::SetGroupMove(false));
        command(C::ButtonLayerUp, ButtonClick, V::LayerUp);
        command(C::ButtonLayerDown, ButtonClick, V::LayerDown);
        let layers = [
            C::ButtonLayer1,
            C::ButtonLayer2,
            C::ButtonLayer3,
            C::ButtonLayer4,
            C::ButtonLayer5,
            C::ButtonLayer6,
            C::ButtonLayer7,
            C::ButtonLayer8,
            C::ButtonLayer9,
        ];
        for (layer, control) in (1..).zip(layers) {
            command(control, CheckBoxSelected, V::SetLayer(layer));
        }
        command(C::ButtonShowOptions, ButtonClick, V::ShowOptions);
        command(C::ButtonShowLog, ButtonClick, V::ShowLog);
        command(C::ButtonZoomEvent, ButtonClick, V::ZoomLastEvent);

        command(C::ButtonLeftHandDrop, ButtonClick, V::DropOrPickUp(Hand::Left));
        command(C::ButtonRightHandDrop, ButtonClick, V::DropOrPickUp(Hand::Right));
        command(C::ButtonLeftHandThrow, ButtonClick, V::Throw(Hand::Left));
        command(C::ButtonRightHandThrow, ButtonClick, V::Throw(Hand::Right));

        command(C::ButtonOk, ButtonClick, V::Confirm);
        command(C::ButtonCancel, ButtonClick, V::Cancel);
        command(C::ButtonControl, ButtonClick, V::PsiMode(PsiStatus::Control));
        command(C::ButtonPanic, ButtonClick, V::PsiMode(PsiStatus::Panic));
        command(C::ButtonStun, ButtonClick, V::PsiMode(PsiStatus::Stun));
        command(C::ButtonProbe, ButtonClick, V::PsiMode(PsiStatus::Probe));

        command(C::MedikitHeadButton, ButtonClick, V::Heal(BodyPart::Helmet));
        command(C::MedikitBodyButton, ButtonClick, V::Heal(BodyPart::Body));
        command(C::MedikitLeftHandButton, ButtonClick, V::Heal(BodyPart::LeftArm));
        command(C::MedikitRightHandButton, ButtonClick, V::Heal(BodyPart::RightArm));
        command(C::MedikitLegsButton, ButtonClick, V::Heal(BodyPart::Legs));

        let posture = [
            (C::ButtonCeaseFire, PostureCommand::ToggleCeaseFire),
            (C::ButtonAimed, PostureCommand::SetAiming(AimingMode::Aimed)),
            (C::ButtonSnap, PostureCommand::SetAiming(AimingMode::Snap)),
            (C::ButtonAuto, PostureCommand::SetAiming(AimingMode::Auto)),
            (C::ButtonKneel, PostureCommand::ToggleKneel),
            (C::ButtonProne, PostureCommand::SetMovement(MovementMode::Prone)),
            (C::ButtonWalk, PostureCommand::SetMovement(MovementMode::Walking)),
            (C::ButtonRun, PostureCommand::SetMovement(MovementMode::Running)),
            (C::ButtonEvasive, PostureCommand::SetBehavior(BehaviorMode::Evasive)),
            (C::ButtonNormal, PostureCommand::SetBehavior(BehaviorMode::Normal)),
            (C::ButtonAggressive, PostureCommand::SetBehavior(BehaviorMode::Aggressive)),
        ];
        for (control, order) in posture {
            command(control, ButtonClick, V::Posture(order));
        }

        match mode {
            BattleMode::RealTime => {
                let speeds = [
                    (C::ButtonSpeed0, UpdateSpeed::Pause),
                    (C::ButtonSpeed1, UpdateSpeed::Speed1),
                    (C::ButtonSpeed2, UpdateSpeed::Speed2),
                    (C::ButtonSpeed3, UpdateSpeed::Speed3),
                ];
                for (control, speed) in speeds {
                    command(control, CheckBoxSelected, V::SetSpeed(speed));
                }
            }
            BattleMode::TurnBased => {
                command(C::ButtonEndturn, ButtonClick, V::EndTurn);
                let reserves = [
                    (C::ButtonReserveAimed, PostureCommand::ToggleReserveShot(ReserveShotMode::Aimed)),
                    (C::ButtonReserveSnap, PostureCommand::ToggleReserveShot(ReserveShotMode::Snap)),
                    (C::ButtonReserveAuto, PostureCommand::ToggleReserveShot(ReserveShotMode::Auto)),
                    (C::ButtonReserveKneel, PostureCommand::ToggleReserveKneel),
                ];
                for (control, order) in reserves {
                    command(control, ButtonClick, V::Posture(order));
                }
            }
        }

        table.bind(C::OverlayLeftHand, MouseDown, Binding::UseHand(Hand::Left));
        table.bind(C::OverlayRightHand, MouseDown, Binding::UseHand(Hand::Right));
        table.bind(C::ButtonFollowAgent, CheckBoxChanged, Binding::FollowAgent);
        table.bind(C::ButtonToggleStratmap, CheckBoxChanged, Binding::StrategyMap);
        table.bind(C::ButtonLayering, ControlEventKind::TriStateChanged, Binding::Layering);
        table.bind(C::DelaySlider, ControlEventKind::ScrollChanged, Binding::PrimingDelay);
        table.bind(C::RangeSlider, ControlEventKind::ScrollChanged, Binding::PrimingRange);
        table
    }

    pub fn bind(&mut self, control: ControlId, kind: ControlEventKind, binding: Binding) {
        self.bindings.insert((control, kind), binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn resolve(&self, control: ControlId, event: ControlEvent) -> Result<ViewCommand, ViewError> {
        let kind = ControlEventKind::from(event);
        self.bindings
            .get(&(control, kind))
            .and_then(|binding| binding.complete(event))
            .ok_or_else(|| {
                let error = ViewError::UnhandledControl {
                    control: control.name(),
                    event: kind.name(),
                };
                warn!(target: "view", %error, "control event ignored");
                error
            })
    }
}
